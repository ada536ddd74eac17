//! Query embedding providers.
//!
//! Vector retrieval embeds the user query with the configured provider
//! before the search request is sent.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{LocalProvider, OllamaEmbeddingProvider, OpenAiEmbeddingProvider};
