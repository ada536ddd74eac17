//! Chat completion provider implementations.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::{
    http_client, http_client_with_timeout, OpenAiClient, OpenAiTarget, REQUEST_TIMEOUT_SECS,
};
