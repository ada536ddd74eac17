//! Configuration management for grounded.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config files (.grounded/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The configuration is workspace-centric, with prompt
//! definitions and the config file stored in `.grounded/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Providers accepted for chat completions and embeddings.
pub const KNOWN_PROVIDERS: [&str; 4] = ["openai", "azure-openai", "ollama", "local"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .grounded/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Chat completion provider (e.g., "openai", "azure-openai", "ollama")
    pub provider: String,

    /// Chat model identifier
    pub model: String,

    /// API key for the chat provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log line format ("pretty" or "json")
    pub log_format: String,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,

    /// Search index settings
    pub search: SearchConfig,

    /// Retrieve-then-read settings
    pub approach: ApproachConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(rename = "activeEmbeddingProvider")]
    pub active_embedding_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
///
/// Variants are matched in declaration order, so the Azure shape (which
/// requires a deployment) is tried before the plain OpenAI one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    AzureOpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        endpoint: String,
        deployment: String,
        #[serde(rename = "apiVersion")]
        api_version: String,
        model: String,
        #[serde(rename = "embeddingDeployment")]
        embedding_deployment: Option<String>,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
    },
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        endpoint: Option<String>,
        #[serde(rename = "organizationEnv")]
        organization_env: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        /// Request timeout in seconds for chat and embedding calls
        timeout: Option<u64>,
    },
    Local {
        dimensions: usize,
    },
}

impl ProviderConfig {
    /// Chat model name for this provider.
    pub fn model(&self) -> &str {
        match self {
            Self::AzureOpenAI { model, .. } => model,
            Self::OpenAI { model, .. } => model,
            Self::Ollama { model, .. } => model,
            Self::Local { .. } => "local",
        }
    }

    /// Custom endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::AzureOpenAI { endpoint, .. } => Some(endpoint),
            Self::OpenAI { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
            Self::Local { .. } => None,
        }
    }

    /// Chat deployment name (Azure OpenAI only).
    pub fn deployment(&self) -> Option<&str> {
        match self {
            Self::AzureOpenAI { deployment, .. } => Some(deployment),
            _ => None,
        }
    }

    /// Embedding model name if configured.
    pub fn embedding_model(&self) -> Option<&str> {
        match self {
            Self::AzureOpenAI {
                embedding_model, ..
            }
            | Self::OpenAI {
                embedding_model, ..
            }
            | Self::Ollama {
                embedding_model, ..
            } => embedding_model.as_deref(),
            Self::Local { .. } => Some("trigram-v1"),
        }
    }
}

/// Search index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Search service endpoint, e.g. `https://<service>.search.windows.net`
    pub endpoint: Option<String>,

    /// Index name
    pub index: String,

    /// Environment variable holding the query key
    pub api_key_env: String,

    /// REST API version
    pub api_version: String,

    /// Field holding the citation name of a passage
    pub sourcepage_field: String,

    /// Field holding the passage text
    pub content_field: String,

    /// Language used by the semantic ranker
    pub query_language: String,

    /// Speller used by the semantic ranker
    pub query_speller: String,

    /// Whether the index carries `oids` and `groups` fields
    pub has_auth_fields: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            index: "gptkbindex".to_string(),
            api_key_env: "AZURE_SEARCH_KEY".to_string(),
            api_version: "2023-11-01".to_string(),
            sourcepage_field: "sourcepage".to_string(),
            content_field: "content".to_string(),
            query_language: "en-us".to_string(),
            query_speller: "lexicon".to_string(),
            has_auth_fields: false,
        }
    }
}

/// Retrieve-then-read settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApproachConfig {
    /// Always apply oid and group security filters
    pub require_access_control: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    search: Option<SearchConfig>,
    approach: Option<ApproachConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    format: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "openai".to_string(),
            model: "gpt-35-turbo".to_string(),
            api_key: None,
            log_level: None,
            log_format: "pretty".to_string(),
            verbose: false,
            no_color: false,
            llm: None,
            search: SearchConfig::default(),
            approach: ApproachConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `GROUNDED_WORKSPACE`: Override workspace path
    /// - `GROUNDED_CONFIG`: Path to config file
    /// - `GROUNDED_PROVIDER`: Chat provider
    /// - `GROUNDED_MODEL`: Chat model identifier
    /// - `GROUNDED_API_KEY`: API key for the chat provider
    /// - `GROUNDED_SEARCH_ENDPOINT`: Search service endpoint
    /// - `GROUNDED_SEARCH_INDEX`: Search index name
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use grounded_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], with an explicit workspace and config file
    /// taking precedence over `GROUNDED_WORKSPACE` and `GROUNDED_CONFIG`.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace
            .or_else(|| std::env::var("GROUNDED_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        if let Some(config_file) = config_file
            .or_else(|| std::env::var("GROUNDED_CONFIG").ok().map(PathBuf::from))
        {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.grounded_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("GROUNDED_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("GROUNDED_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("GROUNDED_SEARCH_ENDPOINT") {
            config.search.endpoint = Some(endpoint);
        }

        if let Ok(index) = std::env::var("GROUNDED_SEARCH_INDEX") {
            config.search.index = index;
        }

        config.api_key = std::env::var("GROUNDED_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok().or(config.log_level);

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(approach) = config_file.approach {
            result.approach = approach;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file. Workspace and config file paths are applied earlier
    /// by [`load_from`](Self::load_from).
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .grounded directory.
    pub fn grounded_dir(&self) -> PathBuf {
        self.workspace.join(".grounded")
    }

    /// Parsed log format; unknown names fall back to pretty output.
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format).unwrap_or_default()
    }

    /// Get a provider configuration by name.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Name of the provider used for query embeddings.
    ///
    /// Falls back to the chat provider when no embedding provider is configured.
    pub fn embedding_provider(&self) -> &str {
        self.llm
            .as_ref()
            .map(|llm| llm.active_embedding_provider.as_str())
            .unwrap_or(&self.provider)
    }

    /// Resolve the API key for a provider.
    ///
    /// `GROUNDED_API_KEY` wins, then the provider's `apiKeyEnv` variable.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider)? {
            ProviderConfig::OpenAI { api_key_env, .. }
            | ProviderConfig::AzureOpenAI { api_key_env, .. } => std::env::var(api_key_env).ok(),
            _ => None,
        }
    }

    /// Resolve the search query key from `search.apiKeyEnv`.
    pub fn resolve_search_key(&self) -> Option<String> {
        std::env::var(&self.search.api_key_env).ok()
    }

    /// Validate configuration for the active providers and search index.
    pub fn validate(&self) -> AppResult<()> {
        for provider in [self.provider.as_str(), self.embedding_provider()] {
            if !KNOWN_PROVIDERS.contains(&provider) && self.get_provider_config(provider).is_none() {
                return Err(AppError::Config(format!(
                    "Unknown provider: {}. Supported: {}",
                    provider,
                    KNOWN_PROVIDERS.join(", ")
                )));
            }
        }

        if let Some(
            ProviderConfig::OpenAI { api_key_env, .. }
            | ProviderConfig::AzureOpenAI { api_key_env, .. },
        ) = self.get_provider_config(&self.provider)
        {
            if self.api_key.is_none() && std::env::var(api_key_env).is_err() {
                return Err(AppError::Config(format!(
                    "API key not found in environment variable: {}",
                    api_key_env
                )));
            }
        }

        if self.search.endpoint.is_none() {
            return Err(AppError::Config(
                "Search endpoint is not configured (search.endpoint or GROUNDED_SEARCH_ENDPOINT)"
                    .to_string(),
            ));
        }

        if self.approach.require_access_control && !self.search.has_auth_fields {
            return Err(AppError::Config(
                "requireAccessControl needs an index with oids and groups fields".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn configured() -> AppConfig {
        let mut config = AppConfig::default();
        config.provider = "ollama".to_string();
        config.search.endpoint = Some("https://example.search.windows.net".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.search.index, "gptkbindex");
        assert_eq!(config.search.sourcepage_field, "sourcepage");
        assert!(!config.approach.require_access_control);
        assert!(!config.verbose);
    }

    #[test]
    fn test_grounded_dir() {
        let config = AppConfig::default();
        assert!(config.grounded_dir().ends_with(".grounded"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let workspace = config.workspace.clone();
        let overridden = config.with_overrides(
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
        assert_eq!(overridden.workspace, workspace);
        assert_eq!(overridden.config_file, None);
    }

    #[test]
    fn test_merge_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: azure-openai
  activeEmbeddingProvider: local
  providers:
    azure-openai:
      apiKeyEnv: AZURE_OPENAI_KEY
      endpoint: https://contoso.openai.azure.com
      deployment: chat
      apiVersion: "2024-02-01"
      model: gpt-35-turbo
      embeddingDeployment: embedding
    local:
      dimensions: 64
search:
  endpoint: https://contoso.search.windows.net
  index: claims
  hasAuthFields: true
approach:
  requireAccessControl: true
logging:
  level: warn
  format: json
"#,
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.provider, "azure-openai");
        assert_eq!(merged.embedding_provider(), "local");
        assert_eq!(merged.model, "gpt-35-turbo");
        assert_eq!(merged.search.index, "claims");
        assert_eq!(merged.search.content_field, "content");
        assert!(merged.search.has_auth_fields);
        assert!(merged.approach.require_access_control);
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert_eq!(merged.log_format(), LogFormat::Json);

        let azure = merged.get_provider_config("azure-openai").unwrap();
        assert_eq!(azure.deployment(), Some("chat"));
        assert!(matches!(
            merged.get_provider_config("local"),
            Some(ProviderConfig::Local { dimensions: 64 })
        ));
    }

    #[test]
    fn test_load_from_explicit_workspace() {
        let temp = TempDir::new().unwrap();
        let grounded_dir = temp.path().join(".grounded");
        std::fs::create_dir_all(&grounded_dir).unwrap();
        std::fs::write(
            grounded_dir.join("config.yaml"),
            "search:\n  index: warranty-claims\n  queryLanguage: en-gb\n",
        )
        .unwrap();

        let config = AppConfig::load_from(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.workspace, temp.path());
        assert_eq!(config.search.query_language, "en-gb");
    }

    #[test]
    fn test_load_from_missing_workspace() {
        let temp = TempDir::new().unwrap();
        let result = AppConfig::load_from(Some(temp.path().join("missing")), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = configured();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_search_endpoint() {
        let mut config = configured();
        config.search.endpoint = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_access_control_needs_auth_fields() {
        let mut config = configured();
        config.approach.require_access_control = true;
        assert!(config.validate().is_err());

        config.search.has_auth_fields = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedding_provider_falls_back_to_chat_provider() {
        let config = configured();
        assert_eq!(config.embedding_provider(), "ollama");
    }
}
