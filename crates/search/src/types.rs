//! Search request and result types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Number of nearest neighbours requested per vector query.
pub const DEFAULT_K_NEAREST_NEIGHBORS: usize = 50;

/// Index field holding passage embeddings.
pub const DEFAULT_VECTOR_FIELD: &str = "embedding";

/// Extractive caption returned by the semantic ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
}

/// A passage returned by the search index.
///
/// Every field is optional because indexes differ in which fields they
/// store and select.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Option<String>,
    pub content: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub category: Option<String>,
    pub sourcepage: Option<String>,
    pub sourcefile: Option<String>,
    pub oids: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
    #[serde(default)]
    pub captions: Vec<Caption>,
    pub score: Option<f64>,
    pub reranker_score: Option<f64>,
}

impl Document {
    /// Citation name of the passage, empty when the index has none.
    pub fn source_page(&self) -> &str {
        self.sourcepage.as_deref().unwrap_or("")
    }

    /// Passage text, empty when absent.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Captions joined with `" . "`, or `None` when the ranker produced none.
    pub fn caption_text(&self) -> Option<String> {
        if self.captions.is_empty() {
            return None;
        }

        Some(
            self.captions
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(" . "),
        )
    }

    /// JSON form used in trace output; embeddings are abbreviated.
    pub fn serialize_for_results(&self) -> Value {
        json!({
            "id": self.id,
            "content": self.content,
            "embedding": self.embedding.as_deref().map(trim_embedding),
            "category": self.category,
            "sourcepage": self.sourcepage,
            "sourcefile": self.sourcefile,
            "oids": self.oids,
            "groups": self.groups,
            "captions": self.captions,
            "score": self.score,
            "reranker_score": self.reranker_score,
        })
    }
}

/// Abbreviate an embedding to its first two components; empty is `null`.
fn trim_embedding(embedding: &[f32]) -> Value {
    if embedding.is_empty() {
        Value::Null
    } else if embedding.len() > 2 {
        Value::String(format!(
            "[{}, {} ...+{} more]",
            embedding[0],
            embedding[1],
            embedding.len() - 2
        ))
    } else {
        json!(embedding)
    }
}

/// A precomputed query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub k_nearest_neighbors: usize,
    pub fields: String,
}

impl VectorQuery {
    /// Query the default embedding field for the 50 nearest neighbours.
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            k_nearest_neighbors: DEFAULT_K_NEAREST_NEIGHBORS,
            fields: DEFAULT_VECTOR_FIELD.to_string(),
        }
    }
}

/// One search invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Number of results to return
    pub top: usize,

    /// Full-text query; `None` for vector-only retrieval
    pub query_text: Option<String>,

    /// OData filter expression
    pub filter: Option<String>,

    /// Vector queries (zero or one in practice)
    pub vectors: Vec<VectorQuery>,

    /// Re-rank with the semantic ranker
    pub use_semantic_ranker: bool,

    /// Ask the semantic ranker for extractive captions
    pub use_semantic_captions: bool,
}

impl SearchRequest {
    /// Whether the semantic ranker path applies: it needs query text.
    pub fn uses_semantic_path(&self) -> bool {
        self.use_semantic_ranker && self.query_text.is_some()
    }
}
