//! Application layer - Orchestration of a retrieval session.
//!
//! This layer wires domain types to ports:
//! - `ToolBackendSession` - backend lifecycle, discovery, invocation, teardown
//! - `ReasoningDispatcher` - one model call per query
//! - `InteractiveLoop` - read / dispatch / display until the sentinel

mod dispatcher;
mod interactive_loop;
mod session;

pub use dispatcher::{ReasoningDispatcher, DEFAULT_MAX_TOKENS};
pub use interactive_loop::{InteractiveLoop, LoopSettings, LoopSummary};
pub use session::ToolBackendSession;
