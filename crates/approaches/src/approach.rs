//! The approach abstraction: one answering strategy per implementation.

use crate::overrides::ApproachContext;
use grounded_core::AppResult;
use grounded_llm::{ChatCompletion, ChatMessage};
use serde_json::Value;

/// An end-to-end answering strategy.
///
/// Implementations hold no per-call state, so one instance can serve
/// concurrent calls.
#[async_trait::async_trait]
pub trait Approach: Send + Sync {
    /// Answer the last message of `messages`.
    ///
    /// `session_state` is echoed back unchanged on the first choice.
    async fn run(
        &self,
        messages: &[ChatMessage],
        context: &ApproachContext,
        session_state: Option<Value>,
    ) -> AppResult<ChatCompletion>;
}
