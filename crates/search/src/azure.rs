//! Azure AI Search REST client.
//!
//! Issues a single `docs/search` call per request and maps the raw result
//! rows onto [`Document`] using the configured field names.

use crate::client::SearchClient;
use crate::types::{Caption, Document, SearchRequest, VectorQuery};
use grounded_core::config::SearchConfig;
use grounded_core::{AppError, AppResult};
use grounded_llm::providers::http_client;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SEMANTIC_CONFIGURATION: &str = "default";
const EXTRACTIVE_CAPTIONS: &str = "extractive|highlight-false";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    search: &'a str,
    top: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speller: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic_configuration: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captions: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    vector_queries: Vec<VectorQueryBody<'a>>,
}

#[derive(Debug, Serialize)]
struct VectorQueryBody<'a> {
    kind: &'static str,
    vector: &'a [f32],
    k: usize,
    fields: &'a str,
}

impl<'a> From<&'a VectorQuery> for VectorQueryBody<'a> {
    fn from(query: &'a VectorQuery) -> Self {
        Self {
            kind: "vector",
            vector: &query.vector,
            k: query.k_nearest_neighbors,
            fields: &query.fields,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<Map<String, Value>>,
}

/// Client for one Azure AI Search index.
pub struct AzureSearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
    config: SearchConfig,
}

impl AzureSearchClient {
    /// Create a client from the `search` config section.
    ///
    /// # Errors
    /// Returns `AppError::Config` when no endpoint is configured.
    pub fn new(config: &SearchConfig, api_key: impl Into<String>) -> AppResult<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| AppError::Config("Search endpoint is not configured".to_string()))?;

        Ok(Self {
            client: http_client()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            config: config.clone(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.config.index, self.config.api_version
        )
    }

    fn build_body<'a>(&'a self, request: &'a SearchRequest) -> SearchBody<'a> {
        let semantic = request.uses_semantic_path();

        SearchBody {
            search: request.query_text.as_deref().unwrap_or(""),
            top: request.top,
            filter: request.filter.as_deref(),
            query_type: semantic.then_some("semantic"),
            query_language: semantic.then_some(self.config.query_language.as_str()),
            speller: semantic.then_some(self.config.query_speller.as_str()),
            semantic_configuration: semantic.then_some(SEMANTIC_CONFIGURATION),
            captions: (semantic && request.use_semantic_captions).then_some(EXTRACTIVE_CAPTIONS),
            vector_queries: request.vectors.iter().map(VectorQueryBody::from).collect(),
        }
    }

    fn map_document(&self, mut row: Map<String, Value>) -> Document {
        let mut take_string = |key: &str| match row.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };

        let content = take_string(&self.config.content_field);
        let sourcepage = take_string(&self.config.sourcepage_field);
        let id = take_string("id");
        let category = take_string("category");
        let sourcefile = take_string("sourcefile");

        let captions = row
            .remove("@search.captions")
            .and_then(|v| serde_json::from_value::<Vec<Caption>>(v).ok())
            .unwrap_or_default();

        Document {
            id,
            content,
            embedding: take_json(&mut row, "embedding"),
            category,
            sourcepage,
            sourcefile,
            oids: take_json(&mut row, "oids"),
            groups: take_json(&mut row, "groups"),
            captions,
            score: row.get("@search.score").and_then(Value::as_f64),
            reranker_score: row.get("@search.rerankerScore").and_then(Value::as_f64),
        }
    }
}

fn take_json<T: serde::de::DeserializeOwned>(row: &mut Map<String, Value>, key: &str) -> Option<T> {
    row.remove(key)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v).ok())
}

#[async_trait::async_trait]
impl SearchClient for AzureSearchClient {
    fn index_name(&self) -> &str {
        &self.config.index
    }

    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<Document>> {
        let body = self.build_body(request);

        tracing::info!(
            index = %self.config.index,
            top = request.top,
            semantic = request.uses_semantic_path(),
            vectors = request.vectors.len(),
            "Searching index"
        );

        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to send search request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!(
                "Search API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        let documents: Vec<Document> = parsed
            .value
            .into_iter()
            .map(|row| self.map_document(row))
            .collect();

        tracing::debug!(results = documents.len(), "Search complete");

        Ok(documents)
    }
}
