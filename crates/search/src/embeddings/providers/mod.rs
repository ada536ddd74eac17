//! Embedding provider implementations.

pub mod local;
pub mod ollama;
pub mod openai;

pub use local::{LocalProvider, DEFAULT_LOCAL_DIMENSIONS};
pub use ollama::{OllamaEmbeddingProvider, DEFAULT_OLLAMA_EMBEDDING_MODEL};
pub use openai::{OpenAiEmbeddingProvider, DEFAULT_OPENAI_EMBEDDING_MODEL};
