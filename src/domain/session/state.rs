//! SessionState enum for tracking the lifecycle of a backend session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of a backend session.
///
/// ```text
/// Disconnected ──> Connecting ──> Ready ──> Closed
///      │               │                      ▲
///      └───────────────┴──────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Ready,
    Closed,
}

impl SessionState {
    /// Returns true if tool operations are allowed.
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }

    /// Returns true once the session has been torn down.
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Disconnected, Connecting)
                | (Disconnected, Closed)
                | (Connecting, Ready)
                | (Connecting, Closed)
                | (Ready, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Disconnected => vec![Connecting, Closed],
            Connecting => vec![Ready, Closed],
            Ready => vec![Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Ready => "ready",
            SessionState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
