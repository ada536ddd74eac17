//! Ask command handler.
//!
//! Assembles the conversation, overrides and claims from flags and files,
//! builds the retrieve-then-read approach from configuration and prints
//! the answer.

use anyhow::{anyhow, bail, Context};
use clap::Args;
use grounded_approaches::{
    Approach, ApproachContext, AuthClaims, Overrides, RetrievalMode, RetrieveThenReadApproach,
    SecurityFilterBuilder,
};
use grounded_core::{config::AppConfig, AppError};
use grounded_llm::{create_client, ChatCompletion, ChatMessage};
use grounded_prompt::{load_prompt, render_prompt};
use grounded_search::{create_provider, AzureSearchClient};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Answer a question from the search index
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask (appended to --messages when both are given)
    pub question: Option<String>,

    /// JSON file with prior conversation messages ([{role, content}])
    #[arg(long)]
    pub messages: Option<PathBuf>,

    /// JSON or YAML file with request overrides
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// JSON or YAML file with caller claims ({oid, groups})
    #[arg(long)]
    pub claims: Option<PathBuf>,

    /// Retrieval mode (text, vectors, hybrid; default: hybrid)
    #[arg(long)]
    pub retrieval_mode: Option<RetrievalMode>,

    /// Re-rank results with the semantic ranker
    #[arg(long)]
    pub semantic_ranker: bool,

    /// Use semantic captions instead of full passages
    #[arg(long)]
    pub semantic_captions: bool,

    /// Number of passages to retrieve
    #[arg(long)]
    pub top: Option<usize>,

    /// Temperature for answer generation
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Replace the built-in system instructions
    #[arg(long, conflicts_with = "prompt_id")]
    pub prompt_template: Option<String>,

    /// Use a prompt definition from .grounded/prompts as system instructions
    #[arg(long)]
    pub prompt_id: Option<String>,

    /// Exclude passages of this category
    #[arg(long)]
    pub exclude_category: Option<String>,

    /// Include the built-in example question and answer
    #[arg(long)]
    pub few_shot: bool,

    /// Session state (JSON) echoed back in the response
    #[arg(long)]
    pub session_state: Option<String>,

    /// Output the full completion as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        config.validate()?;

        let messages = self.build_messages()?;
        let context = self.build_context(&config.workspace)?;
        let session_state = self.parse_session_state()?;
        let approach = build_approach(config, &context.overrides)?;

        let completion = tokio::select! {
            result = approach.run(&messages, &context, session_state) => result?,
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted before the answer arrived");
                bail!("Interrupted");
            }
        };

        self.print(&completion)
    }

    /// Prior messages from `--messages`, followed by the positional question.
    fn build_messages(&self) -> anyhow::Result<Vec<ChatMessage>> {
        let mut messages: Vec<ChatMessage> = match &self.messages {
            Some(path) => read_structured(path)?,
            None => Vec::new(),
        };

        if let Some(question) = &self.question {
            messages.push(ChatMessage::user(question.as_str()));
        }

        if messages.is_empty() {
            bail!("No question provided (pass a question or --messages)");
        }

        Ok(messages)
    }

    /// Overrides from `--overrides`, with individual flags applied on top.
    fn build_context(&self, workspace: &Path) -> anyhow::Result<ApproachContext> {
        let mut overrides: Overrides = match &self.overrides {
            Some(path) => read_structured(path)?,
            None => Overrides::default(),
        };

        if let Some(mode) = self.retrieval_mode {
            overrides.retrieval_mode = Some(mode);
        }
        overrides.semantic_ranker |= self.semantic_ranker;
        overrides.semantic_captions |= self.semantic_captions;
        overrides.include_few_shot_example |= self.few_shot;

        if let Some(top) = self.top {
            overrides.top = Some(top);
        }
        if let Some(temperature) = self.temperature {
            overrides.temperature = Some(temperature);
        }
        if let Some(category) = &self.exclude_category {
            overrides.exclude_category = Some(category.clone());
        }

        if let Some(template) = &self.prompt_template {
            overrides.prompt_template = Some(template.clone());
        } else if let Some(prompt_id) = &self.prompt_id {
            let definition = load_prompt(workspace, prompt_id)?;
            overrides.prompt_template = Some(render_prompt(&definition, &HashMap::new())?);
        }

        let auth_claims: AuthClaims = match &self.claims {
            Some(path) => read_structured(path)?,
            None => AuthClaims::default(),
        };

        Ok(ApproachContext::new(overrides, auth_claims))
    }

    fn parse_session_state(&self) -> anyhow::Result<Option<Value>> {
        self.session_state
            .as_deref()
            .map(|raw| serde_json::from_str(raw).context("--session-state is not valid JSON"))
            .transpose()
    }

    fn print(&self, completion: &ChatCompletion) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(completion)?);
            return Ok(());
        }

        let choice = completion
            .choices
            .first()
            .ok_or_else(|| anyhow!("Completion has no choices"))?;
        if choice.message.content.is_none() {
            tracing::warn!(finish_reason = ?choice.finish_reason, "Completion carried no content");
        }
        println!("{}", choice.message.text());

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                "Token usage - Prompt: {}, Completion: {}, Total: {}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(())
    }
}

/// Wire the approach's collaborators from configuration.
///
/// The embedding provider is only built when the request retrieves by
/// vector, so text-only runs need no embedding deployment or key.
fn build_approach(
    config: &AppConfig,
    overrides: &Overrides,
) -> anyhow::Result<RetrieveThenReadApproach> {
    let search_key = config.resolve_search_key().ok_or_else(|| {
        anyhow!(
            "Search key not found in environment variable: {}",
            config.search.api_key_env
        )
    })?;
    let search_client = AzureSearchClient::new(&config.search, search_key)?;

    let embedder = if overrides.has_vector() {
        let embedding_provider = config.embedding_provider();
        Some(create_provider(
            embedding_provider,
            config.get_provider_config(embedding_provider),
            config.resolve_api_key(embedding_provider).as_deref(),
        )?)
    } else {
        None
    };

    let chat_config = config.get_provider_config(&config.provider);
    let chat_client = create_client(
        &config.provider,
        chat_config,
        config.resolve_api_key(&config.provider).as_deref(),
    )
    .map_err(AppError::Config)?;
    let deployment = chat_config
        .and_then(|pc| pc.deployment())
        .map(str::to_string);

    tracing::debug!(
        index = %config.search.index,
        chat_provider = chat_client.provider_name(),
        embedding_provider = embedder.as_ref().map(|e| e.provider_name()),
        "Built retrieve-then-read approach"
    );

    let filter_builder = SecurityFilterBuilder::new(
        config.approach.require_access_control,
        config.search.has_auth_fields,
    );

    let mut approach = RetrieveThenReadApproach::new(
        Arc::new(search_client),
        chat_client,
        Arc::new(filter_builder),
        config.model.as_str(),
    )
    .with_chat_deployment(deployment);
    if let Some(embedder) = embedder {
        approach = approach.with_embedder(embedder);
    }

    Ok(approach)
}

/// Read a JSON (`.json`) or YAML (anything else) file.
fn read_structured<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
    } else {
        serde_yaml::from_str(&contents).with_context(|| format!("Invalid YAML in {}", path.display()))
    }
}
