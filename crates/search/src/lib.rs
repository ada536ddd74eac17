//! Retrieval backends for grounded.
//!
//! This crate provides:
//! - `Document`, `SearchRequest` and `VectorQuery` types
//! - The `SearchClient` trait and an Azure AI Search implementation
//! - Query embedding providers (OpenAI, Azure OpenAI, Ollama, local trigram)

pub mod azure;
pub mod client;
pub mod embeddings;
pub mod types;

pub use azure::AzureSearchClient;
pub use client::SearchClient;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use types::{Caption, Document, SearchRequest, VectorQuery};
