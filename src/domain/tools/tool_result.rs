//! Tool call result - raw output returned by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBlock {
    /// Plain text.
    Text(String),
    /// Any non-text block (image, resource, ...), kept opaque.
    Other(serde_json::Value),
}

impl ContentBlock {
    /// Creates a text block.
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text(text.into())
    }

    /// Returns the text if this block is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) => Some(text),
            ContentBlock::Other(_) => None,
        }
    }
}

/// Result of a single tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Output blocks in backend order
    content: Vec<ContentBlock>,

    /// Whether the tool reported an error
    is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful result.
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Creates a successful single-text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentBlock::text(text)])
    }

    /// Creates a result the tool flagged as an error.
    pub fn error(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: true,
        }
    }

    /// Returns the content blocks.
    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    /// Returns true if the tool flagged this result as an error.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Text of the first block, if the first block is textual.
    ///
    /// Later blocks are never consulted.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(ContentBlock::as_text)
    }

    /// All text blocks joined, for error reporting.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ToolCallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.content.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match block {
                ContentBlock::Text(text) => write!(f, "{}", text)?,
                ContentBlock::Other(value) => write!(f, "[non-text block] {}", value)?,
            }
        }
        Ok(())
    }
}
