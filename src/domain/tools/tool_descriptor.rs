//! Tool descriptor - schema and metadata for a backend tool.

use serde::{Deserialize, Serialize};

/// Description of a tool exposed by the backend.
///
/// Consumed verbatim from discovery and forwarded to the reasoning model
/// without transformation.
///
/// # Examples
///
/// ```ignore
/// use doc_retrieval::domain::tools::ToolDescriptor;
///
/// let descriptor = ToolDescriptor::new(
///     "milvus_pypmilvus_code_generator",
///     "Find pymilvus documentation relevant to a query",
///     serde_json::json!({
///         "type": "object",
///         "required": ["query"],
///         "properties": { "query": { "type": "string" } }
///     }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool within a session
    name: String,

    /// Human-readable description for the model
    description: String,

    /// JSON Schema for the tool's input
    input_schema: serde_json::Value,
}

impl ToolDescriptor {
    /// Creates a new tool descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    pub fn input_schema(&self) -> &serde_json::Value {
        &self.input_schema
    }

    /// Converts to Anthropic tool format.
    pub fn to_anthropic_format(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema
        })
    }
}
