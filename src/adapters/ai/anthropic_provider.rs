//! Anthropic Provider - Implementation of AIProvider for Anthropic's Messages API.
//!
//! Sends one non-streaming request per query with the backend's tools
//! attached, and maps the returned content blocks onto a [`ModelTurn`].
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-3-5-sonnet-20241022")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let provider = AnthropicProvider::new(config)?;
//! ```
//!
//! Failed calls are surfaced once; nothing here retries.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::reasoning::{ModelTurn, TurnBlock};
use crate::domain::tools::{ToolArguments, ToolCall};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Default model for tool selection.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "claude-3-5-sonnet-20241022").
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_secret(Secret::new(api_key.into()))
    }

    /// Creates a configuration from an already-wrapped key.
    pub fn from_secret(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the messages endpoint URL.
    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to Anthropic's format.
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| AnthropicMessage {
                role: match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            tools: request
                .tools
                .iter()
                .map(|tool| tool.to_anthropic_format())
                .collect(),
        }
    }

    /// Sends a request and handles the response.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let anthropic_request = self.to_anthropic_request(request);

        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&anthropic_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(Self::status_error(status.as_u16(), error_body))
    }

    /// Maps a non-success HTTP status onto an [`AIError`].
    fn status_error(status: u16, error_body: String) -> AIError {
        match status {
            401 | 403 => AIError::AuthenticationFailed,
            429 => AIError::rate_limited(Self::parse_retry_after(&error_body)),
            400 | 404 | 413 | 422 => AIError::InvalidRequest(error_body),
            500..=599 => {
                AIError::unavailable(format!("Server error {}: {}", status, error_body))
            }
            _ => AIError::network(format!("Unexpected status {}: {}", status, error_body)),
        }
    }

    /// Parses retry-after from error response.
    fn parse_retry_after(error_body: &str) -> u32 {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
            if let Some(s) = parsed
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                if let Some(idx) = s.find("try again in ") {
                    let rest = &s[idx + 13..];
                    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                    if let Ok(secs) = digits.parse::<u32>() {
                        return secs;
                    }
                }
            }
        }
        60
    }

    /// Parses a successful response body.
    fn parse_response_body(body: &str) -> Result<CompletionResponse, AIError> {
        let anthropic_response: AnthropicResponse = serde_json::from_str(body)
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let blocks = anthropic_response
            .content
            .into_iter()
            .map(|block| match block {
                AnthropicContent::Text { text } => TurnBlock::PlainText(text),
                AnthropicContent::ToolUse { id, name, input } => {
                    TurnBlock::ToolInvocation(ToolCall::new(name, input).with_id(id))
                }
            })
            .collect();

        let finish_reason = match anthropic_response.stop_reason.as_deref() {
            Some("max_tokens") => FinishReason::Length,
            Some("tool_use") => FinishReason::ToolUse,
            _ => FinishReason::Stop,
        };

        Ok(CompletionResponse {
            turn: ModelTurn::new(blocks),
            usage: TokenUsage::new(
                anthropic_response.usage.input_tokens,
                anthropic_response.usage.output_tokens,
            ),
            model: anthropic_response.model,
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        let response = self.handle_response_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| AIError::network(format!("Failed to read response: {}", e)))?;

        Self::parse_response_body(&body)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model).with_tools(true)
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<AnthropicContent>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

/// Content blocks this client understands. Any other block type fails parsing.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContent {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: ToolArguments,
    },
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::ToolDescriptor;
    use crate::ports::RequestMetadata;
    use serde_json::json;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(AnthropicConfig::new("test-key")).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-opus-20240229")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "claude-3-opus-20240229");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_defaults_to_sonnet() {
        let config = AnthropicConfig::new("k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn messages_url_tolerates_trailing_slash() {
        let provider = AnthropicProvider::new(
            AnthropicConfig::new("k").with_base_url("http://localhost:8080/"),
        )
        .unwrap();
        assert_eq!(provider.messages_url(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn request_carries_tools_and_budget() {
        let request = CompletionRequest::new(1000, RequestMetadata::new("trace"))
            .with_message(MessageRole::User, "find docs")
            .with_tools(vec![ToolDescriptor::new(
                "search_docs",
                "Search",
                json!({"type": "object"}),
            )]);

        let body = serde_json::to_value(provider().to_anthropic_request(&request)).unwrap();

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["tools"][0]["name"], "search_docs");
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");
        assert!(body.get("system").is_none());
    }

    #[test]
    fn request_omits_empty_tool_list() {
        let request = CompletionRequest::new(10, RequestMetadata::new("t"))
            .with_message(MessageRole::User, "hi");
        let body = serde_json::to_value(provider().to_anthropic_request(&request)).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn parses_text_and_tool_use_blocks_in_order() {
        let body = json!({
            "model": "claude-3-5-sonnet-20241022",
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 12, "output_tokens": 7},
            "content": [
                {"type": "text", "text": "Let me search."},
                {"type": "tool_use", "id": "toolu_1", "name": "search_docs", "input": {"query": "install"}}
            ]
        })
        .to_string();

        let response = AnthropicProvider::parse_response_body(&body).unwrap();

        assert_eq!(response.finish_reason, FinishReason::ToolUse);
        assert_eq!(response.usage.total_tokens, 19);
        let blocks = response.turn.blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], TurnBlock::PlainText("Let me search.".to_string()));
        match &blocks[1] {
            TurnBlock::ToolInvocation(call) => {
                assert_eq!(call.name(), "search_docs");
                assert_eq!(call.id(), Some("toolu_1"));
                assert_eq!(call.arguments()["query"], "install");
            }
            other => panic!("expected tool invocation, got {:?}", other),
        }
    }

    #[test]
    fn unknown_block_type_is_parse_error() {
        let body = json!({
            "model": "m",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1, "output_tokens": 1},
            "content": [{"type": "thinking", "thinking": "hmm"}]
        })
        .to_string();

        let err = AnthropicProvider::parse_response_body(&body).unwrap_err();
        assert!(matches!(err, AIError::Parse(_)));
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert!(matches!(
            AnthropicProvider::status_error(401, String::new()),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            AnthropicProvider::status_error(429, String::new()),
            AIError::RateLimited { retry_after_secs: 60 }
        ));
        assert!(matches!(
            AnthropicProvider::status_error(400, "bad".to_string()),
            AIError::InvalidRequest(_)
        ));
        assert!(AnthropicProvider::status_error(503, String::new()).is_retryable());
    }

    #[test]
    fn parse_retry_after_reads_message() {
        let error = r#"{"error":{"message":"Please try again in 12s"}}"#;
        assert_eq!(AnthropicProvider::parse_retry_after(error), 12);
    }

    #[test]
    fn provider_info_reports_tools() {
        let info = provider().provider_info();
        assert_eq!(info.name, "anthropic");
        assert_eq!(info.model, DEFAULT_MODEL);
        assert!(info.supports_tools);
    }
}
