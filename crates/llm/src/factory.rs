//! Chat provider factory.
//!
//! Creates chat clients from the provider name and its optional config
//! entry, resolving endpoints and secrets along the way.

use crate::client::ChatClient;
use crate::providers::openai::{DEFAULT_OPENAI_URL, REQUEST_TIMEOUT_SECS};
use crate::providers::{OllamaClient, OpenAiClient, OpenAiTarget};
use grounded_core::config::ProviderConfig;
use std::sync::Arc;

/// Create a chat client for a provider.
///
/// When a config entry exists its shape decides the client type; otherwise
/// the provider name does ("openai", "azure-openai", "ollama").
///
/// # Arguments
/// * `provider` - Provider identifier
/// * `config` - Provider config entry from config.yaml, if any
/// * `api_key` - API key for providers that require one
///
/// # Errors
/// Returns error if:
/// - Provider is unknown or only supports embeddings
/// - Required secrets or settings are missing
/// - Client initialization fails
pub fn create_client(
    provider: &str,
    config: Option<&ProviderConfig>,
    api_key: Option<&str>,
) -> Result<Arc<dyn ChatClient>, String> {
    match config {
        Some(ProviderConfig::Ollama {
            endpoint, timeout, ..
        }) => {
            let client = OllamaClient::with_timeout(
                endpoint.as_str(),
                timeout.unwrap_or(REQUEST_TIMEOUT_SECS),
            )
            .map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
        Some(ProviderConfig::OpenAI {
            endpoint,
            organization_env,
            ..
        }) => {
            let api_key = api_key.ok_or("OpenAI provider requires API key")?;
            let organization = organization_env
                .as_ref()
                .and_then(|var| std::env::var(var).ok());
            openai_client(OpenAiTarget::OpenAi {
                base_url: endpoint.as_deref().unwrap_or(DEFAULT_OPENAI_URL).to_string(),
                api_key: api_key.to_string(),
                organization,
            })
        }
        Some(ProviderConfig::AzureOpenAI {
            endpoint,
            api_version,
            ..
        }) => {
            let api_key = api_key.ok_or("Azure OpenAI provider requires API key")?;
            openai_client(OpenAiTarget::Azure {
                endpoint: endpoint.clone(),
                api_key: api_key.to_string(),
                api_version: api_version.clone(),
            })
        }
        Some(ProviderConfig::Local { .. }) => Err(format!(
            "Provider '{}' only supports embeddings",
            provider
        )),
        None => create_default_client(provider, api_key),
    }
}

/// Create a client from the provider name alone, using default endpoints.
fn create_default_client(
    provider: &str,
    api_key: Option<&str>,
) -> Result<Arc<dyn ChatClient>, String> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let client = OllamaClient::new().map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
        "openai" => {
            let api_key = api_key.ok_or("OpenAI provider requires API key")?;
            openai_client(OpenAiTarget::OpenAi {
                base_url: DEFAULT_OPENAI_URL.to_string(),
                api_key: api_key.to_string(),
                organization: None,
            })
        }
        "azure-openai" => Err(
            "Azure OpenAI provider requires an endpoint, deployment and apiVersion in config.yaml"
                .to_string(),
        ),
        "local" => Err("Provider 'local' only supports embeddings".to_string()),
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}

fn openai_client(target: OpenAiTarget) -> Result<Arc<dyn ChatClient>, String> {
    let client = OpenAiClient::new(target).map_err(|e| e.to_string())?;
    Ok(Arc::new(client))
}
