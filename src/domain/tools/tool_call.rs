//! Tool call - a request to invoke one backend tool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named arguments for a tool call.
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// A request to invoke a tool.
///
/// Represents the model's intent to call a specific tool with arguments.
///
/// # Examples
///
/// ```ignore
/// use doc_retrieval::domain::tools::ToolCall;
///
/// let mut args = serde_json::Map::new();
/// args.insert("query".into(), "how to create an index".into());
/// let call = ToolCall::new("search_docs", args);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier the model assigned to this invocation, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// Name of the tool to invoke
    name: String,

    /// Arguments for the tool
    arguments: ToolArguments,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    /// Attaches the model-assigned invocation id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the invocation id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &ToolArguments {
        &self.arguments
    }

    /// Arguments as a JSON object value.
    pub fn arguments_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.arguments.clone())
    }
}

impl fmt::Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.arguments_value())
    }
}
