//! OpenAI and Azure OpenAI embedding provider.

use crate::embeddings::provider::EmbeddingProvider;
use grounded_core::{AppError, AppResult};
use grounded_llm::providers::http_client;
use grounded_llm::OpenAiTarget;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Model used when the provider entry names no embedding model.
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider {
    target: OpenAiTarget,
    client: Client,
    model: String,
    deployment: Option<String>,
}

impl OpenAiEmbeddingProvider {
    pub fn new(target: OpenAiTarget, model: &str) -> AppResult<Self> {
        Ok(Self {
            target,
            client: http_client()?,
            model: model.to_string(),
            deployment: None,
        })
    }

    /// Route requests to an Azure deployment instead of the model name.
    pub fn with_deployment(mut self, deployment: &str) -> Self {
        self.deployment = Some(deployment.to_string());
        self
    }

    fn url(&self) -> String {
        let name = self.deployment.as_deref().unwrap_or(&self.model);
        self.target.url(name, "embeddings")
    }
}

/// Order embeddings by their `index` field.
fn into_ordered(mut data: Vec<EmbeddingData>, expected: usize) -> AppResult<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(AppError::Embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn provider_name(&self) -> &str {
        self.target.provider_name()
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url();
        tracing::debug!(
            provider = self.provider_name(),
            model = %self.model,
            batch_size = texts.len(),
            "Requesting embeddings"
        );

        let response = self
            .target
            .authorize(self.client.post(&url))
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to send embedding request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(format!(
                "{} embeddings error ({}): {}",
                self.provider_name(),
                status,
                error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse embeddings: {}", e)))?;

        into_ordered(body.data, texts.len())
    }
}
