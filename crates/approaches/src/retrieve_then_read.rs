//! Retrieve-then-read: search once, then answer once from the retrieved passages.

use crate::approach::Approach;
use crate::filter::FilterBuilder;
use crate::overrides::ApproachContext;
use crate::sources::get_sources_content;
use crate::thought::{DataPoints, ResponseContext, ThoughtStep};
use grounded_core::{AppError, AppResult};
use grounded_llm::{ChatClient, ChatCompletion, ChatMessage, ChatRequest, ChatRole};
use grounded_prompt::{MessageBuilder, DEFAULT_SYSTEM_TEMPLATE, FEW_SHOT_ANSWER, FEW_SHOT_QUESTION};
use grounded_search::{EmbeddingProvider, SearchClient, SearchRequest, VectorQuery};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::Instrument;

/// Completion token limit for the answer.
const MAX_TOKENS: u32 = 1024;

/// Answers a question from the top search results in a single completion.
pub struct RetrieveThenReadApproach {
    search_client: Arc<dyn SearchClient>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    chat_client: Arc<dyn ChatClient>,
    filter_builder: Arc<dyn FilterBuilder>,
    chat_model: String,
    chat_deployment: Option<String>,
}

impl RetrieveThenReadApproach {
    /// Build an approach without an embedder; only text retrieval works
    /// until one is attached with [`with_embedder`](Self::with_embedder).
    pub fn new(
        search_client: Arc<dyn SearchClient>,
        chat_client: Arc<dyn ChatClient>,
        filter_builder: Arc<dyn FilterBuilder>,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            search_client,
            embedder: None,
            chat_client,
            filter_builder,
            chat_model: chat_model.into(),
            chat_deployment: None,
        }
    }

    /// Embed queries with `embedder` for vector and hybrid retrieval.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Send completions to a named deployment (Azure OpenAI).
    pub fn with_chat_deployment(mut self, deployment: Option<String>) -> Self {
        self.chat_deployment = deployment;
        self
    }

    /// Deployment when configured, model name otherwise.
    fn completion_model(&self) -> &str {
        self.chat_deployment.as_deref().unwrap_or(&self.chat_model)
    }

    async fn answer(
        &self,
        messages: &[ChatMessage],
        context: &ApproachContext,
        session_state: Option<Value>,
    ) -> AppResult<ChatCompletion> {
        let q = messages
            .last()
            .map(|m| m.content.as_str())
            .ok_or_else(|| AppError::Other("no messages".to_string()))?;

        let overrides = &context.overrides;
        let has_text = overrides.has_text();
        let has_vector = overrides.has_vector();
        let use_semantic_ranker = overrides.use_semantic_ranker();
        let use_semantic_captions = overrides.use_semantic_captions();
        let top = overrides.top();
        let filter = self
            .filter_builder
            .build_filter(overrides, &context.auth_claims)?;

        let mut vectors = Vec::new();
        if has_vector {
            let embedder = self.embedder.as_ref().ok_or_else(|| {
                AppError::Config(
                    "Vector retrieval requires an embedding provider; use retrieval_mode text"
                        .to_string(),
                )
            })?;
            let embedding = embedder.embed(q).await?;
            tracing::debug!(
                provider = embedder.provider_name(),
                dimensions = embedding.len(),
                "Embedded query"
            );
            vectors.push(VectorQuery::new(embedding));
        }

        let query_text = has_text.then(|| q.to_string());

        let request = SearchRequest {
            top,
            query_text: query_text.clone(),
            filter: filter.clone(),
            vectors,
            use_semantic_ranker,
            use_semantic_captions,
        };
        let results = self.search_client.search(&request).await?;

        tracing::info!(
            results = results.len(),
            has_text,
            has_vector,
            "Retrieved passages"
        );

        let sources_content = get_sources_content(&results, use_semantic_captions);

        let template = overrides
            .prompt_template
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_TEMPLATE);
        let mut builder = MessageBuilder::new(template);

        let user_content = format!("{}\nSources:\n {}", q, sources_content.join("\n"));
        builder.insert_message(ChatRole::User, &user_content);
        if overrides.include_few_shot_example {
            builder.insert_message(ChatRole::Assistant, FEW_SHOT_ANSWER);
            builder.insert_message(ChatRole::User, FEW_SHOT_QUESTION);
        }
        let prompt_messages = builder.into_messages();

        let chat_request = ChatRequest::new(self.completion_model(), prompt_messages.clone())
            .with_temperature(overrides.temperature())
            .with_max_tokens(MAX_TOKENS)
            .with_n(1);
        let mut completion = self.chat_client.complete(&chat_request).await?;

        let mut prompt_step = ThoughtStep::new(
            "Prompt to generate answer",
            serde_json::to_value(&prompt_messages)?,
        )
        .with_prop("model", self.chat_model.as_str());
        if let Some(deployment) = &self.chat_deployment {
            prompt_step = prompt_step.with_prop("deployment", deployment.as_str());
        }

        let response_context = ResponseContext {
            data_points: DataPoints {
                text: sources_content,
            },
            thoughts: vec![
                ThoughtStep::new("Search using user query", json!(query_text))
                    .with_prop("use_semantic_captions", use_semantic_captions)
                    .with_prop("use_semantic_ranker", use_semantic_ranker)
                    .with_prop("top", top)
                    .with_prop("filter", json!(filter))
                    .with_prop("has_vector", has_vector),
                ThoughtStep::new(
                    "Search results",
                    Value::Array(results.iter().map(|d| d.serialize_for_results()).collect()),
                ),
                prompt_step,
            ],
        };

        let choice = completion.choices.first_mut().ok_or_else(|| {
            AppError::Llm(format!(
                "{} returned no completion choices",
                self.chat_client.provider_name()
            ))
        })?;
        choice.context = Some(serde_json::to_value(&response_context)?);
        choice.session_state = Some(session_state.unwrap_or(Value::Null));

        Ok(completion)
    }
}

#[async_trait::async_trait]
impl Approach for RetrieveThenReadApproach {
    async fn run(
        &self,
        messages: &[ChatMessage],
        context: &ApproachContext,
        session_state: Option<Value>,
    ) -> AppResult<ChatCompletion> {
        let span = tracing::info_span!(
            "retrieve_then_read",
            index = self.search_client.index_name(),
            model = %self.completion_model()
        );
        self.answer(messages, context, session_state)
            .instrument(span)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SecurityFilterBuilder;
    use crate::overrides::{AuthClaims, Overrides, RetrievalMode};
    use grounded_llm::ChatChoice;
    use grounded_search::{Caption, Document};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSearch {
        results: Vec<Document>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    #[async_trait::async_trait]
    impl SearchClient for FakeSearch {
        fn index_name(&self) -> &str {
            "test-index"
        }

        async fn search(&self, request: &SearchRequest) -> AppResult<Vec<Document>> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.results.clone())
        }
    }

    #[derive(Debug, Default)]
    struct FakeEmbedder {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        fn provider_name(&self) -> &str {
            "fake"
        }

        fn model_name(&self) -> &str {
            "fake-embedding"
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            self.calls.lock().unwrap().extend(texts.iter().cloned());
            Ok(texts.iter().map(|_| vec![0.5, 0.25, 0.125]).collect())
        }
    }

    struct FakeChat {
        choices: usize,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl FakeChat {
        fn new(choices: usize) -> Self {
            Self {
                choices,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatClient for FakeChat {
        fn provider_name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, request: &ChatRequest) -> AppResult<ChatCompletion> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(ChatCompletion {
                id: "chatcmpl-1".to_string(),
                object: "chat.completion".to_string(),
                created: 0,
                model: request.model.clone(),
                choices: (0..self.choices)
                    .map(|i| {
                        ChatChoice::new(
                            i as u32,
                            "In-network deductibles are $500 [info1.txt].",
                            Some("stop".to_string()),
                        )
                    })
                    .collect(),
                usage: None,
                extra: Default::default(),
            })
        }
    }

    struct FailingEmbedder;

    impl std::fmt::Debug for FailingEmbedder {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("FailingEmbedder")
        }
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn provider_name(&self) -> &str {
            "failing"
        }

        fn model_name(&self) -> &str {
            "none"
        }

        fn dimensions(&self) -> usize {
            0
        }

        async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            Err(AppError::Embedding("service unavailable".to_string()))
        }
    }

    struct Harness {
        search: Arc<FakeSearch>,
        embedder: Arc<FakeEmbedder>,
        chat: Arc<FakeChat>,
        approach: RetrieveThenReadApproach,
    }

    fn documents() -> Vec<Document> {
        vec![
            Document {
                id: Some("1".to_string()),
                content: Some("In-network deductibles are $500\nfor employee.".to_string()),
                sourcepage: Some("info1.txt".to_string()),
                embedding: Some(vec![0.1, 0.2, 0.3, 0.4]),
                captions: vec![Caption {
                    text: "deductibles are $500".to_string(),
                    highlights: None,
                }],
                ..Default::default()
            },
            Document {
                id: Some("2".to_string()),
                content: Some("Overlake is in-network for the employee plan.".to_string()),
                sourcepage: Some("Benefit_Options-2.png".to_string()),
                ..Default::default()
            },
        ]
    }

    fn harness_with(choices: usize, deployment: Option<&str>) -> Harness {
        let search = Arc::new(FakeSearch {
            results: documents(),
            ..Default::default()
        });
        let embedder = Arc::new(FakeEmbedder::default());
        let chat = Arc::new(FakeChat::new(choices));
        let approach = RetrieveThenReadApproach::new(
            search.clone(),
            chat.clone(),
            Arc::new(SecurityFilterBuilder::default()),
            "gpt-35-turbo",
        )
        .with_embedder(embedder.clone())
        .with_chat_deployment(deployment.map(str::to_string));

        Harness {
            search,
            embedder,
            chat,
            approach,
        }
    }

    fn harness() -> Harness {
        harness_with(1, None)
    }

    fn question() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("Earlier question"),
            ChatMessage::assistant("Earlier answer"),
            ChatMessage::user("What is the deductible?"),
        ]
    }

    fn context(overrides: Overrides) -> ApproachContext {
        ApproachContext::new(overrides, AuthClaims::default())
    }

    fn response_context(completion: &ChatCompletion) -> Value {
        completion.choices[0].context.clone().unwrap()
    }

    #[tokio::test]
    async fn test_default_overrides_run_hybrid() {
        let h = harness();
        let completion = h
            .approach
            .run(&question(), &context(Overrides::default()), None)
            .await
            .unwrap();

        let requests = h.search.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.top, 3);
        assert_eq!(request.query_text.as_deref(), Some("What is the deductible?"));
        assert_eq!(request.filter, None);
        assert_eq!(request.vectors, vec![VectorQuery::new(vec![0.5, 0.25, 0.125])]);
        assert!(!request.use_semantic_ranker);
        assert!(!request.use_semantic_captions);

        assert_eq!(
            *h.embedder.calls.lock().unwrap(),
            vec!["What is the deductible?".to_string()]
        );

        let chat_requests = h.chat.requests.lock().unwrap();
        assert_eq!(chat_requests.len(), 1);
        let chat_request = &chat_requests[0];
        assert_eq!(chat_request.model, "gpt-35-turbo");
        assert_eq!(chat_request.temperature, Some(0.3));
        assert_eq!(chat_request.max_tokens, Some(1024));
        assert_eq!(chat_request.n, Some(1));
        assert_eq!(chat_request.messages.len(), 2);
        assert_eq!(chat_request.messages[0].role, ChatRole::System);
        assert_eq!(chat_request.messages[0].content, DEFAULT_SYSTEM_TEMPLATE);
        assert_eq!(
            chat_request.messages[1],
            ChatMessage::user(
                "What is the deductible?\nSources:\n info1.txt: In-network deductibles are $500 for employee.\nBenefit_Options.pdf#page=2: Overlake is in-network for the employee plan."
            )
        );

        let ctx = response_context(&completion);
        assert_eq!(
            ctx["data_points"]["text"],
            json!([
                "info1.txt: In-network deductibles are $500 for employee.",
                "Benefit_Options.pdf#page=2: Overlake is in-network for the employee plan."
            ])
        );
        assert_eq!(completion.choices[0].session_state, Some(Value::Null));
    }

    #[tokio::test]
    async fn test_thoughts_in_fixed_order() {
        let h = harness();
        let completion = h
            .approach
            .run(&question(), &context(Overrides::default()), None)
            .await
            .unwrap();

        let ctx = response_context(&completion);
        let thoughts = ctx["thoughts"].as_array().unwrap();
        assert_eq!(thoughts.len(), 3);
        assert_eq!(thoughts[0]["title"], "Search using user query");
        assert_eq!(thoughts[1]["title"], "Search results");
        assert_eq!(thoughts[2]["title"], "Prompt to generate answer");

        assert_eq!(thoughts[0]["description"], "What is the deductible?");
        assert_eq!(
            thoughts[0]["props"],
            json!({
                "use_semantic_captions": false,
                "use_semantic_ranker": false,
                "top": 3,
                "filter": null,
                "has_vector": true
            })
        );

        let results = thoughts[1]["description"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["embedding"], "[0.1, 0.2 ...+2 more]");

        let prompt = thoughts[2]["description"].as_array().unwrap();
        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[1]["role"], "user");
        assert_eq!(thoughts[2]["props"], json!({"model": "gpt-35-turbo"}));
    }

    #[tokio::test]
    async fn test_vectors_only_skips_text_and_semantic_features() {
        let h = harness();
        let overrides = Overrides {
            retrieval_mode: Some(RetrievalMode::Vectors),
            semantic_ranker: true,
            semantic_captions: true,
            ..Default::default()
        };

        let completion = h
            .approach
            .run(&question(), &context(overrides), None)
            .await
            .unwrap();

        let requests = h.search.requests.lock().unwrap();
        assert_eq!(requests[0].query_text, None);
        assert_eq!(requests[0].vectors.len(), 1);
        assert!(!requests[0].use_semantic_ranker);
        assert!(!requests[0].use_semantic_captions);

        let ctx = response_context(&completion);
        assert!(ctx["thoughts"][0]["description"].is_null());
        assert_eq!(ctx["thoughts"][0]["props"]["has_vector"], json!(true));
        // Captions are off, so content is used even where captions exist.
        assert_eq!(
            ctx["data_points"]["text"][0],
            "info1.txt: In-network deductibles are $500 for employee."
        );
    }

    #[tokio::test]
    async fn test_text_only_with_captions() {
        let h = harness();
        let overrides = Overrides {
            retrieval_mode: Some(RetrievalMode::Text),
            semantic_ranker: true,
            semantic_captions: true,
            top: Some(5),
            ..Default::default()
        };

        let completion = h
            .approach
            .run(&question(), &context(overrides), None)
            .await
            .unwrap();

        assert!(h.embedder.calls.lock().unwrap().is_empty());
        let requests = h.search.requests.lock().unwrap();
        assert!(requests[0].vectors.is_empty());
        assert_eq!(requests[0].top, 5);
        assert!(requests[0].use_semantic_ranker);
        assert!(requests[0].use_semantic_captions);

        let ctx = response_context(&completion);
        assert_eq!(
            ctx["data_points"]["text"],
            json!([
                "info1.txt: deductibles are $500",
                "Benefit_Options.pdf#page=2: Overlake is in-network for the employee plan."
            ])
        );
        assert_eq!(ctx["thoughts"][0]["props"]["has_vector"], json!(false));
    }

    #[tokio::test]
    async fn test_custom_prompt_template_and_temperature() {
        let h = harness();
        let overrides = Overrides {
            prompt_template: Some("Answer briefly.".to_string()),
            temperature: Some(0.9),
            ..Default::default()
        };

        h.approach
            .run(&question(), &context(overrides), None)
            .await
            .unwrap();

        let chat_requests = h.chat.requests.lock().unwrap();
        assert_eq!(chat_requests[0].messages[0].content, "Answer briefly.");
        assert_eq!(chat_requests[0].temperature, Some(0.9));
    }

    #[tokio::test]
    async fn test_prompt_template_is_nfc_normalized() {
        let h = harness();
        let overrides = Overrides {
            prompt_template: Some("Cafe\u{0301}".to_string()),
            ..Default::default()
        };

        h.approach
            .run(&question(), &context(overrides), None)
            .await
            .unwrap();

        assert_eq!(h.chat.requests.lock().unwrap()[0].messages[0].content, "Caf\u{e9}");
    }

    #[tokio::test]
    async fn test_few_shot_example_sits_between_system_and_user() {
        let h = harness();
        let overrides = Overrides {
            include_few_shot_example: true,
            ..Default::default()
        };

        h.approach
            .run(&question(), &context(overrides), None)
            .await
            .unwrap();

        let chat_requests = h.chat.requests.lock().unwrap();
        let messages = &chat_requests[0].messages;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1], ChatMessage::user(FEW_SHOT_QUESTION));
        assert_eq!(messages[2], ChatMessage::assistant(FEW_SHOT_ANSWER));
        assert!(messages[3].content.starts_with("What is the deductible?\nSources:\n "));
    }

    #[tokio::test]
    async fn test_deployment_used_as_model() {
        let h = harness_with(1, Some("chat-deployment"));
        let completion = h
            .approach
            .run(&question(), &context(Overrides::default()), None)
            .await
            .unwrap();

        assert_eq!(h.chat.requests.lock().unwrap()[0].model, "chat-deployment");
        let ctx = response_context(&completion);
        assert_eq!(
            ctx["thoughts"][2]["props"],
            json!({"model": "gpt-35-turbo", "deployment": "chat-deployment"})
        );
    }

    #[tokio::test]
    async fn test_filter_forwarded_to_search_and_thoughts() {
        let h = harness();
        let overrides = Overrides {
            exclude_category: Some("hr".to_string()),
            ..Default::default()
        };

        let completion = h
            .approach
            .run(&question(), &context(overrides), None)
            .await
            .unwrap();

        assert_eq!(
            h.search.requests.lock().unwrap()[0].filter.as_deref(),
            Some("category ne 'hr'")
        );
        assert_eq!(
            response_context(&completion)["thoughts"][0]["props"]["filter"],
            "category ne 'hr'"
        );
    }

    #[tokio::test]
    async fn test_session_state_echoed_on_first_choice_only() {
        let h = harness_with(2, None);
        let state = json!({"conversation": 42});
        let completion = h
            .approach
            .run(&question(), &context(Overrides::default()), Some(state.clone()))
            .await
            .unwrap();

        assert_eq!(completion.choices[0].session_state, Some(state));
        assert!(completion.choices[1].context.is_none());
        assert!(completion.choices[1].session_state.is_none());

        let serialized = serde_json::to_value(&completion).unwrap();
        assert_eq!(serialized["choices"][0]["session_state"]["conversation"], 42);
    }

    #[tokio::test]
    async fn test_absent_session_state_serializes_as_null() {
        let h = harness();
        let completion = h
            .approach
            .run(&question(), &context(Overrides::default()), None)
            .await
            .unwrap();

        let serialized = serde_json::to_value(&completion).unwrap();
        let choice = serialized["choices"][0].as_object().unwrap();
        assert!(choice.contains_key("session_state"));
        assert!(choice["session_state"].is_null());
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_search_props() {
        let h = harness();
        let ctx = context(Overrides::default());

        let first = h.approach.run(&question(), &ctx, None).await.unwrap();
        let second = h.approach.run(&question(), &ctx, None).await.unwrap();

        assert_eq!(
            response_context(&first)["thoughts"][0],
            response_context(&second)["thoughts"][0]
        );
    }

    #[tokio::test]
    async fn test_empty_messages_fail() {
        let h = harness();
        let result = h
            .approach
            .run(&[], &context(Overrides::default()), None)
            .await;

        assert!(matches!(result, Err(AppError::Other(_))));
        assert!(h.search.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_choices_is_llm_error() {
        let h = harness_with(0, None);
        let result = h
            .approach
            .run(&question(), &context(Overrides::default()), None)
            .await;

        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_embedding_error_propagates_before_search() {
        let search = Arc::new(FakeSearch::default());
        let chat = Arc::new(FakeChat::new(1));
        let approach = RetrieveThenReadApproach::new(
            search.clone(),
            chat.clone(),
            Arc::new(SecurityFilterBuilder::default()),
            "gpt-35-turbo",
        )
        .with_embedder(Arc::new(FailingEmbedder));

        let result = approach
            .run(&question(), &context(Overrides::default()), None)
            .await;

        assert!(matches!(result, Err(AppError::Embedding(_))));
        assert!(search.requests.lock().unwrap().is_empty());
        assert!(chat.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_text_mode_runs_without_embedder() {
        let search = Arc::new(FakeSearch {
            results: documents(),
            ..Default::default()
        });
        let chat = Arc::new(FakeChat::new(1));
        let approach = RetrieveThenReadApproach::new(
            search.clone(),
            chat.clone(),
            Arc::new(SecurityFilterBuilder::default()),
            "gpt-35-turbo",
        );
        let overrides = Overrides {
            retrieval_mode: Some(RetrievalMode::Text),
            ..Default::default()
        };

        let completion = approach
            .run(&question(), &context(overrides), None)
            .await
            .unwrap();

        let requests = search.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].vectors.is_empty());
        assert_eq!(
            requests[0].query_text.as_deref(),
            Some("What is the deductible?")
        );
        assert_eq!(chat.requests.lock().unwrap().len(), 1);
        assert!(completion.choices[0].context.is_some());
    }

    #[tokio::test]
    async fn test_vector_mode_without_embedder_is_config_error() {
        let search = Arc::new(FakeSearch::default());
        let chat = Arc::new(FakeChat::new(1));
        let approach = RetrieveThenReadApproach::new(
            search.clone(),
            chat.clone(),
            Arc::new(SecurityFilterBuilder::default()),
            "gpt-35-turbo",
        );

        let result = approach
            .run(&question(), &context(Overrides::default()), None)
            .await;

        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(search.requests.lock().unwrap().is_empty());
        assert!(chat.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_error_propagates() {
        let search = Arc::new(FakeSearch::default());
        let approach = RetrieveThenReadApproach::new(
            search.clone(),
            Arc::new(FakeChat::new(1)),
            Arc::new(SecurityFilterBuilder::new(true, false)),
            "gpt-35-turbo",
        )
        .with_embedder(Arc::new(FakeEmbedder::default()));

        let result = approach
            .run(&question(), &context(Overrides::default()), None)
            .await;

        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(search.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_results_still_answer() {
        let search = Arc::new(FakeSearch::default());
        let chat = Arc::new(FakeChat::new(1));
        let approach = RetrieveThenReadApproach::new(
            search,
            chat.clone(),
            Arc::new(SecurityFilterBuilder::default()),
            "gpt-35-turbo",
        )
        .with_embedder(Arc::new(FakeEmbedder::default()));

        let completion = approach
            .run(&question(), &context(Overrides::default()), None)
            .await
            .unwrap();

        assert_eq!(
            chat.requests.lock().unwrap()[0].messages[1].content,
            "What is the deductible?\nSources:\n "
        );
        assert_eq!(response_context(&completion)["data_points"]["text"], json!([]));
    }
}
