//! Model turn - a single reasoning-model response.

use serde::{Deserialize, Serialize};

use crate::domain::tools::ToolCall;

/// One block of a model response.
///
/// Closed set: provider adapters must map every block they receive onto one
/// of these variants or fail the whole turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnBlock {
    /// Free text. Cannot be converted into document references.
    PlainText(String),
    /// A request to invoke a backend tool.
    ToolInvocation(ToolCall),
}

/// A full model response: its blocks in the order returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTurn {
    blocks: Vec<TurnBlock>,
}

impl ModelTurn {
    /// Creates a turn from blocks.
    pub fn new(blocks: Vec<TurnBlock>) -> Self {
        Self { blocks }
    }

    /// Creates a turn holding a single text block.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::new(vec![TurnBlock::PlainText(text.into())])
    }

    /// Creates a turn holding a single tool invocation.
    pub fn tool_invocation(call: ToolCall) -> Self {
        Self::new(vec![TurnBlock::ToolInvocation(call)])
    }

    /// Returns the blocks in model order.
    pub fn blocks(&self) -> &[TurnBlock] {
        &self.blocks
    }

    /// Consumes the turn and returns its blocks.
    pub fn into_blocks(self) -> Vec<TurnBlock> {
        self.blocks
    }

    /// Tool invocations in model order.
    pub fn tool_invocations(&self) -> impl Iterator<Item = &ToolCall> {
        self.blocks.iter().filter_map(|block| match block {
            TurnBlock::ToolInvocation(call) => Some(call),
            TurnBlock::PlainText(_) => None,
        })
    }

    /// Returns true if the model asked for at least one tool call.
    pub fn has_tool_invocation(&self) -> bool {
        self.tool_invocations().next().is_some()
    }
}
