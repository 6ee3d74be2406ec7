//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured model turns (consumed in order)
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_tool_call("search_docs", json!({"query": "install"}))
//!     .with_text("I don't need a tool for that.");
//!
//! let response = provider.complete(request).await?;
//! assert!(response.turn.has_tool_invocation());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::reasoning::ModelTurn;
use crate::domain::tools::{ToolArguments, ToolCall};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this turn.
    Turn(ModelTurn),
    /// Return an error.
    Error(AIError),
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a full turn.
    pub fn with_turn(self, turn: ModelTurn) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Turn(turn));
        self
    }

    /// Queues a turn with a single tool invocation.
    ///
    /// `arguments` must be a JSON object; anything else is sent as no arguments.
    pub fn with_tool_call(self, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        let arguments: ToolArguments = match arguments {
            serde_json::Value::Object(map) => map,
            _ => ToolArguments::new(),
        };
        let call = ToolCall::new(name, arguments).with_id("toolu_mock");
        self.with_turn(ModelTurn::tool_invocation(call))
    }

    /// Queues a plain-text turn.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_turn(ModelTurn::plain_text(text))
    }

    /// Queues an error.
    pub fn with_error(self, error: AIError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Gets the next response, or an empty text turn once the queue runs dry.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Turn(ModelTurn::plain_text("Mock response")))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.calls.lock().unwrap().push(request);

        match self.next_response() {
            MockResponse::Turn(turn) => {
                let finish_reason = if turn.has_tool_invocation() {
                    FinishReason::ToolUse
                } else {
                    FinishReason::Stop
                };
                Ok(CompletionResponse {
                    turn,
                    usage: TokenUsage::new(10, 20),
                    model: self.info.model.clone(),
                    finish_reason,
                })
            }
            MockResponse::Error(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
