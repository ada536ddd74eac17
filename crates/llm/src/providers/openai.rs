//! OpenAI and Azure OpenAI chat completion provider.
//!
//! Both services accept the same request body; they differ in URL layout
//! and authentication header. `OpenAiTarget` captures that difference and is
//! shared with the embedding provider in `grounded-search`.

use crate::client::{ChatClient, ChatCompletion, ChatRequest};
use grounded_core::{AppError, AppResult};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Where OpenAI-compatible requests are sent and how they are authorized.
#[derive(Debug, Clone)]
pub enum OpenAiTarget {
    /// api.openai.com or a compatible server; the model goes in the body.
    OpenAi {
        base_url: String,
        api_key: String,
        organization: Option<String>,
    },
    /// Azure OpenAI; the deployment name goes in the URL.
    Azure {
        endpoint: String,
        api_key: String,
        api_version: String,
    },
}

impl OpenAiTarget {
    /// Build the URL for an API path such as `chat/completions`.
    ///
    /// `model` is the deployment name for Azure and ignored otherwise.
    pub fn url(&self, model: &str, path: &str) -> String {
        match self {
            Self::OpenAi { base_url, .. } => {
                format!("{}/{}", base_url.trim_end_matches('/'), path)
            }
            Self::Azure {
                endpoint,
                api_version,
                ..
            } => format!(
                "{}/openai/deployments/{}/{}?api-version={}",
                endpoint.trim_end_matches('/'),
                model,
                path,
                api_version
            ),
        }
    }

    /// Attach authentication headers.
    pub fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::OpenAi {
                api_key,
                organization,
                ..
            } => {
                let builder = builder.bearer_auth(api_key);
                match organization {
                    Some(org) => builder.header("OpenAI-Organization", org),
                    None => builder,
                }
            }
            Self::Azure { api_key, .. } => builder.header("api-key", api_key),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Azure { .. } => "azure-openai",
        }
    }
}

/// Build an HTTP client with the default request timeout.
pub fn http_client() -> AppResult<Client> {
    http_client_with_timeout(REQUEST_TIMEOUT_SECS)
}

/// Build an HTTP client that gives up on a request after `timeout_secs`.
pub fn http_client_with_timeout(timeout_secs: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Llm(format!("Failed to create HTTP client: {}", e)))
}

/// OpenAI-compatible chat completion client.
pub struct OpenAiClient {
    target: OpenAiTarget,
    client: Client,
}

impl OpenAiClient {
    /// Create a client for the given target.
    pub fn new(target: OpenAiTarget) -> AppResult<Self> {
        Ok(Self {
            target,
            client: http_client()?,
        })
    }

    pub fn target(&self) -> &OpenAiTarget {
        &self.target
    }
}

#[async_trait::async_trait]
impl ChatClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        self.target.provider_name()
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatCompletion> {
        let url = self.target.url(&request.model, "chat/completions");

        tracing::info!(
            provider = self.provider_name(),
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );
        tracing::debug!("Request: {:?}", request);

        let response = self
            .target
            .authorize(self.client.post(&url))
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send chat request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "{} API error ({}): {}",
                self.provider_name(),
                status,
                error_text
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse chat completion: {}", e)))?;

        tracing::info!(
            choices = completion.choices.len(),
            total_tokens = completion.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0),
            "Received chat completion"
        );

        Ok(completion)
    }
}
