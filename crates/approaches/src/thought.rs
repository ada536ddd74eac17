//! Diagnostic trace records attached to a response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One pipeline stage as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThoughtStep {
    pub title: String,
    pub description: Value,
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl ThoughtStep {
    pub fn new(title: impl Into<String>, description: Value) -> Self {
        Self {
            title: title.into(),
            description,
            props: Map::new(),
        }
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }
}

/// Passages handed to the model, keyed by modality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPoints {
    pub text: Vec<String>,
}

/// The `context` object attached to the first completion choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseContext {
    pub data_points: DataPoints,
    pub thoughts: Vec<ThoughtStep>,
}
