//! Foundation module - Shared domain primitives.
//!
//! Contains the error kinds surfaced by a retrieval session and the
//! state machine trait used by every lifecycle enum.

mod errors;
mod state_machine;

pub use errors::{
    ConnectionError, ReasoningError, RetrievalError, SessionError, ToolInvocationError,
    TransitionError,
};
pub use state_machine::StateMachine;
