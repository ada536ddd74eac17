//! Per-request overrides, caller claims and the context passed to an approach.

use grounded_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Number of results requested when `top` is not overridden.
pub const DEFAULT_TOP: usize = 3;

/// Sampling temperature used when `temperature` is not overridden.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Which retrieval signals contribute candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    Text,
    Vectors,
    Hybrid,
}

impl FromStr for RetrievalMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "vectors" => Ok(Self::Vectors),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(AppError::Config(format!(
                "Unsupported retrieval mode: {}. Supported: text, vectors, hybrid",
                other
            ))),
        }
    }
}

/// Per-request knobs. Unknown keys are kept in `extra` and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// `None` behaves like hybrid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_mode: Option<RetrievalMode>,

    pub semantic_ranker: bool,

    pub semantic_captions: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Replaces the built-in system instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_category: Option<String>,

    pub use_oid_security_filter: bool,

    pub use_groups_security_filter: bool,

    /// Insert the built-in example question and answer before the user turn
    pub include_few_shot_example: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Overrides {
    /// Whether lexical retrieval is active.
    pub fn has_text(&self) -> bool {
        !matches!(self.retrieval_mode, Some(RetrievalMode::Vectors))
    }

    /// Whether vector retrieval is active.
    pub fn has_vector(&self) -> bool {
        !matches!(self.retrieval_mode, Some(RetrievalMode::Text))
    }

    /// The semantic ranker only applies to text retrieval.
    pub fn use_semantic_ranker(&self) -> bool {
        self.semantic_ranker && self.has_text()
    }

    /// Captions only apply to text retrieval.
    pub fn use_semantic_captions(&self) -> bool {
        self.semantic_captions && self.has_text()
    }

    pub fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Identity claims of the caller, used for security filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,

    pub groups: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything an approach needs besides the conversation itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachContext {
    pub overrides: Overrides,
    pub auth_claims: AuthClaims,
}

impl ApproachContext {
    pub fn new(overrides: Overrides, auth_claims: AuthClaims) -> Self {
        Self {
            overrides,
            auth_claims,
        }
    }
}
