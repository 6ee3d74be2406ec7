//! ReasoningDispatcher - asks the model what to do with a query.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::foundation::ReasoningError;
use crate::domain::reasoning::{render_query_prompt, ModelTurn};
use crate::domain::tools::ToolCatalog;
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Token budget used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Sends one query plus the tool catalog to the reasoning model.
pub struct ReasoningDispatcher {
    provider: Arc<dyn AIProvider>,
    max_tokens: u32,
}

impl ReasoningDispatcher {
    pub fn new(provider: Arc<dyn AIProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Returns the model's turn for `query`.
    ///
    /// Exactly one model call is made; failures are not retried.
    pub async fn decide(
        &self,
        query: &str,
        catalog: &ToolCatalog,
    ) -> Result<ModelTurn, ReasoningError> {
        let metadata = RequestMetadata::generate();
        let trace_id = metadata.trace_id.clone();

        let request = CompletionRequest::new(self.max_tokens, metadata)
            .with_message(MessageRole::User, render_query_prompt(query))
            .with_tools(catalog.tools().to_vec());

        let provider = self.provider.provider_info();
        debug!(
            trace_id = %trace_id,
            provider = %provider.name,
            model = %provider.model,
            tools = catalog.len(),
            "Dispatching query to reasoning model"
        );

        let response = self.provider.complete(request).await?;

        info!(
            trace_id = %trace_id,
            model = %response.model,
            finish_reason = ?response.finish_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Reasoning model responded"
        );

        Ok(response.turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::tools::ToolDescriptor;
    use crate::ports::AIError;
    use serde_json::json;

    fn catalog() -> ToolCatalog {
        ToolCatalog::new(vec![
            ToolDescriptor::new("search_docs", "Search", json!({"type": "object"})),
            ToolDescriptor::new("fetch_doc", "Fetch", json!({"type": "object"})),
        ])
    }

    #[tokio::test]
    async fn sends_prompt_budget_and_catalog_in_order() {
        let provider = Arc::new(MockAIProvider::new().with_tool_call("search_docs", json!({"query": "x"})));
        let dispatcher = ReasoningDispatcher::new(provider.clone(), 1000);

        let turn = dispatcher.decide("how to insert?", &catalog()).await.unwrap();

        assert!(turn.has_tool_invocation());
        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.messages[0].content, render_query_prompt("how to insert?"));
        let names: Vec<&str> = request.tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["search_docs", "fetch_doc"]);
    }

    #[tokio::test]
    async fn each_call_gets_its_own_trace_id() {
        let provider = Arc::new(MockAIProvider::new());
        let dispatcher = ReasoningDispatcher::new(provider.clone(), DEFAULT_MAX_TOKENS);

        dispatcher.decide("a", &catalog()).await.unwrap();
        dispatcher.decide("b", &catalog()).await.unwrap();

        let calls = provider.get_calls();
        assert_ne!(calls[0].metadata.trace_id, calls[1].metadata.trace_id);
    }

    #[tokio::test]
    async fn provider_failure_becomes_reasoning_error_without_retry() {
        let provider = Arc::new(MockAIProvider::new().with_error(AIError::AuthenticationFailed));
        let dispatcher = ReasoningDispatcher::new(provider.clone(), DEFAULT_MAX_TOKENS);

        let err = dispatcher.decide("q", &catalog()).await.unwrap_err();

        assert!(matches!(err, ReasoningError::ModelCall { retryable: false, .. }));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn plain_text_turn_is_returned_as_is() {
        let provider = Arc::new(MockAIProvider::new().with_text("No tool needed."));
        let dispatcher = ReasoningDispatcher::new(provider, DEFAULT_MAX_TOKENS);

        let turn = dispatcher.decide("q", &catalog()).await.unwrap();

        assert_eq!(turn, ModelTurn::plain_text("No tool needed."));
    }
}
