//! Error types for the domain layer.
//!
//! Four kinds cover every failure a retrieval session can surface:
//!
//! | Kind | Raised by | Recoverable |
//! |------|-----------|-------------|
//! | `ConnectionError` | launch, handshake | no, aborts startup |
//! | `SessionError` | wrong lifecycle state | yes, fix call order |
//! | `ToolInvocationError` | backend rejected a call | yes, session stays Ready |
//! | `ReasoningError` | model call failed | yes |

use thiserror::Error;

/// Errors raised while establishing a backend session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("unsupported backend script '{path}': expected a '.{expected}' file")]
    UnsupportedScript { path: String, expected: &'static str },

    #[error("failed to launch backend: {0}")]
    Launch(String),

    #[error("backend handshake failed: {0}")]
    Handshake(String),
}

impl ConnectionError {
    /// Creates an unsupported script error.
    pub fn unsupported_script(path: impl Into<String>, expected: &'static str) -> Self {
        ConnectionError::UnsupportedScript {
            path: path.into(),
            expected,
        }
    }

    /// Creates a launch error.
    pub fn launch(message: impl Into<String>) -> Self {
        ConnectionError::Launch(message.into())
    }

    /// Creates a handshake error.
    pub fn handshake(message: impl Into<String>) -> Self {
        ConnectionError::Handshake(message.into())
    }
}

/// Errors raised when a session operation is attempted in the wrong state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {operation}: session is {state}, not ready")]
    NotReady {
        operation: &'static str,
        state: String,
    },

    #[error("cannot {operation}: session is closed")]
    Closed { operation: &'static str },

    /// Re-discovering tools on a ready session failed. The session stays Ready.
    #[error("tool discovery failed: {0}")]
    Discovery(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl SessionError {
    /// Creates a not-ready error for the given operation and current state.
    pub fn not_ready(operation: &'static str, state: impl std::fmt::Display) -> Self {
        SessionError::NotReady {
            operation,
            state: state.to_string(),
        }
    }

    /// Creates a closed-session error.
    pub fn closed(operation: &'static str) -> Self {
        SessionError::Closed { operation }
    }

    /// Creates a discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        SessionError::Discovery(message.into())
    }
}

/// Errors raised by a single tool invocation.
///
/// None of these close the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolInvocationError {
    /// The backend refused the request (unknown tool, bad arguments).
    #[error("backend rejected call to '{tool}': {message}")]
    Rejected { tool: String, message: String },

    /// The tool ran and reported an error result.
    #[error("tool '{tool}' reported an error: {message}")]
    ToolReported { tool: String, message: String },

    /// The request never produced a response (timeout, broken pipe).
    #[error("call to '{tool}' failed in transport: {message}")]
    Transport { tool: String, message: String },
}

impl ToolInvocationError {
    /// Name of the tool the failed call targeted.
    pub fn tool(&self) -> &str {
        match self {
            ToolInvocationError::Rejected { tool, .. }
            | ToolInvocationError::ToolReported { tool, .. }
            | ToolInvocationError::Transport { tool, .. } => tool,
        }
    }
}

/// Errors raised by the reasoning model call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReasoningError {
    #[error("reasoning model call failed: {message}")]
    ModelCall { message: String, retryable: bool },

    #[error("reasoning model returned an unusable response: {0}")]
    MalformedResponse(String),
}

/// Invalid lifecycle transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot transition from {from} to {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

/// Umbrella error handled at the interactive loop boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    ToolInvocation(#[from] ToolInvocationError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
}

impl RetrievalError {
    /// Short label for the error kind, used in operator diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RetrievalError::Connection(_) => "connection",
            RetrievalError::Session(_) => "session",
            RetrievalError::ToolInvocation(_) => "tool invocation",
            RetrievalError::Reasoning(_) => "reasoning",
        }
    }
}
