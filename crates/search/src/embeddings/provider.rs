//! Embedding provider trait and factory.

use super::providers::{
    LocalProvider, OllamaEmbeddingProvider, OpenAiEmbeddingProvider, DEFAULT_LOCAL_DIMENSIONS,
    DEFAULT_OLLAMA_EMBEDDING_MODEL, DEFAULT_OPENAI_EMBEDDING_MODEL,
};
use grounded_core::config::ProviderConfig;
use grounded_core::{AppError, AppResult};
use grounded_llm::providers::openai::DEFAULT_OPENAI_URL;
use grounded_llm::providers::ollama::DEFAULT_OLLAMA_URL;
use grounded_llm::OpenAiTarget;
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "local", "openai", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider.
///
/// A config entry decides the provider type when present; otherwise the
/// provider name does, using default endpoints and models.
pub fn create_provider(
    provider: &str,
    config: Option<&ProviderConfig>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config {
        Some(ProviderConfig::Local { dimensions }) => Ok(Arc::new(LocalProvider::new(*dimensions))),

        Some(ProviderConfig::Ollama {
            endpoint,
            embedding_model,
            timeout,
            ..
        }) => {
            let model = embedding_model
                .as_deref()
                .unwrap_or(DEFAULT_OLLAMA_EMBEDDING_MODEL);
            let mut embedder = OllamaEmbeddingProvider::new(endpoint, model)?;
            if let Some(secs) = timeout {
                embedder = embedder.with_timeout(*secs)?;
            }
            Ok(Arc::new(embedder))
        }

        Some(ProviderConfig::OpenAI {
            endpoint,
            embedding_model,
            organization_env,
            ..
        }) => {
            let target = OpenAiTarget::OpenAi {
                base_url: endpoint.as_deref().unwrap_or(DEFAULT_OPENAI_URL).to_string(),
                api_key: require_key(provider, api_key)?,
                organization: organization_env
                    .as_ref()
                    .and_then(|var| std::env::var(var).ok()),
            };
            let model = embedding_model
                .as_deref()
                .unwrap_or(DEFAULT_OPENAI_EMBEDDING_MODEL);
            Ok(Arc::new(OpenAiEmbeddingProvider::new(target, model)?))
        }

        Some(ProviderConfig::AzureOpenAI {
            endpoint,
            api_version,
            embedding_deployment,
            embedding_model,
            ..
        }) => {
            let deployment = embedding_deployment.as_deref().ok_or_else(|| {
                AppError::Config(format!(
                    "Provider '{}' has no embeddingDeployment configured",
                    provider
                ))
            })?;
            let target = OpenAiTarget::Azure {
                endpoint: endpoint.clone(),
                api_key: require_key(provider, api_key)?,
                api_version: api_version.clone(),
            };
            let model = embedding_model
                .as_deref()
                .unwrap_or(DEFAULT_OPENAI_EMBEDDING_MODEL);
            Ok(Arc::new(
                OpenAiEmbeddingProvider::new(target, model)?.with_deployment(deployment),
            ))
        }

        None => create_default_provider(provider, api_key),
    }
}

fn create_default_provider(
    provider: &str,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider.to_lowercase().as_str() {
        "local" => Ok(Arc::new(LocalProvider::new(DEFAULT_LOCAL_DIMENSIONS))),

        "ollama" => Ok(Arc::new(OllamaEmbeddingProvider::new(
            DEFAULT_OLLAMA_URL,
            DEFAULT_OLLAMA_EMBEDDING_MODEL,
        )?)),

        "openai" => {
            let target = OpenAiTarget::OpenAi {
                base_url: DEFAULT_OPENAI_URL.to_string(),
                api_key: require_key(provider, api_key)?,
                organization: None,
            };
            Ok(Arc::new(OpenAiEmbeddingProvider::new(
                target,
                DEFAULT_OPENAI_EMBEDDING_MODEL,
            )?))
        }

        "azure-openai" => Err(AppError::Config(
            "Azure OpenAI embeddings need a provider entry with endpoint and embeddingDeployment"
                .to_string(),
        )),

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: local, openai, azure-openai, ollama",
            provider
        ))),
    }
}

fn require_key(provider: &str, api_key: Option<&str>) -> AppResult<String> {
    api_key.map(str::to_string).ok_or_else(|| {
        AppError::Config(format!("Embedding provider '{}' requires an API key", provider))
    })
}
