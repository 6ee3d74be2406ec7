//! Tools module - What the backend offers and what it returns.
//!
//! - `ToolDescriptor` / `ToolCatalog` - discovered tools, in backend order
//! - `ToolCall` - a request to invoke one tool
//! - `ToolCallResult` / `ContentBlock` - raw tool output

mod tool_call;
mod tool_catalog;
mod tool_descriptor;
mod tool_result;

pub use tool_call::{ToolArguments, ToolCall};
pub use tool_catalog::ToolCatalog;
pub use tool_descriptor::ToolDescriptor;
pub use tool_result::{ContentBlock, ToolCallResult};
