//! Search client abstraction.

use crate::types::{Document, SearchRequest};
use grounded_core::AppResult;

/// Trait for search index backends.
///
/// Implementations issue exactly one query per call and return documents
/// ranked best-first.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Name of the index being queried.
    fn index_name(&self) -> &str;

    /// Run one search request.
    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<Document>>;
}
