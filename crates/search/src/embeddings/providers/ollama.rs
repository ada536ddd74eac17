//! Ollama embedding provider.
//!
//! Calls `/api/embeddings` once per text. Failures are returned to the
//! caller without retrying.

use crate::embeddings::provider::EmbeddingProvider;
use grounded_core::{AppError, AppResult};
use grounded_llm::providers::{http_client, http_client_with_timeout};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Model used when the provider entry names no embedding model.
pub const DEFAULT_OLLAMA_EMBEDDING_MODEL: &str = "nomic-embed-text";

const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Dimensions reported for `nomic-embed-text`.
const DEFAULT_DIMENSIONS: usize = 768;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Ollama embedding provider using the local API.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbeddingProvider {
    pub fn new(base_url: &str, model: &str) -> AppResult<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Replace the default request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> AppResult<Self> {
        self.client = http_client_with_timeout(timeout_secs)?;
        Ok(self)
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, EMBEDDING_ENDPOINT)
    }

    #[instrument(skip(self, text), fields(text_len = text.len(), model = %self.model))]
    async fn embed_single(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = self.url();
        debug!("Sending embedding request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::Embedding(format!("Failed to send request to Ollama: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);
            return Err(AppError::Embedding(format!(
                "Ollama API error ({}): {}",
                status, message
            )));
        }

        let body: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::Embedding(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(body.embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        DEFAULT_DIMENSIONS
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        // No batch endpoint; embed sequentially.
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_single(text).await?);
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let provider =
            OllamaEmbeddingProvider::new("http://localhost:11434/", "nomic-embed-text").unwrap();
        assert_eq!(provider.url(), "http://localhost:11434/api/embeddings");
        assert_eq!(provider.model_name(), "nomic-embed-text");
        assert_eq!(provider.provider_name(), "ollama");
    }

    #[test]
    fn test_request_shape() {
        let request = EmbeddingRequest {
            model: "nomic-embed-text",
            prompt: "deductible",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["prompt"], "deductible");
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_requests() {
        let provider = OllamaEmbeddingProvider::new("http://127.0.0.1:9", "m").unwrap();
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }
}
