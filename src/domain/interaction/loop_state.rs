//! LoopState enum for the read-query / dispatch / display cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// State of the interactive loop.
///
/// ```text
/// AwaitingInput ──> Dispatching ──> Displaying ──> AwaitingInput
///       │                │
///       │                └──(error)──> AwaitingInput
///       └──(sentinel / end of input)──> Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    #[default]
    AwaitingInput,
    Dispatching,
    Displaying,
    Terminated,
}

impl StateMachine for LoopState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use LoopState::*;
        matches!(
            (self, target),
            (AwaitingInput, Dispatching)
                | (AwaitingInput, Terminated)
                | (Dispatching, Displaying)
                | (Dispatching, AwaitingInput)
                | (Displaying, AwaitingInput)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LoopState::*;
        match self {
            AwaitingInput => vec![Dispatching, Terminated],
            Dispatching => vec![Displaying, AwaitingInput],
            Displaying => vec![AwaitingInput],
            Terminated => vec![],
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopState::AwaitingInput => "awaiting_input",
            LoopState::Dispatching => "dispatching",
            LoopState::Displaying => "displaying",
            LoopState::Terminated => "terminated",
        };
        write!(f, "{}", s)
    }
}

/// What a raw input line means to the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopInput {
    /// Blank line, ignored.
    Empty,
    /// The quit sentinel, in any letter case.
    Quit,
    /// A query to dispatch, trimmed.
    Query(String),
}

/// Classifies one input line against the quit sentinel.
pub fn classify_input(line: &str, quit_sentinel: &str) -> LoopInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LoopInput::Empty
    } else if trimmed.eq_ignore_ascii_case(quit_sentinel) {
        LoopInput::Quit
    } else {
        LoopInput::Query(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_in_any_case_is_sentinel() {
        for line in ["quit", "QUIT", "Quit", "  qUiT \n"] {
            assert_eq!(classify_input(line, "quit"), LoopInput::Quit, "{:?}", line);
        }
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(classify_input("   \n", "quit"), LoopInput::Empty);
    }

    #[test]
    fn other_text_is_trimmed_query() {
        assert_eq!(
            classify_input("  how to insert rows?\n", "quit"),
            LoopInput::Query("how to insert rows?".to_string())
        );
    }

    #[test]
    fn sentinel_must_match_whole_line() {
        assert_eq!(
            classify_input("quit now", "quit"),
            LoopInput::Query("quit now".to_string())
        );
    }

    #[test]
    fn error_path_returns_to_awaiting_input() {
        assert!(LoopState::Dispatching.can_transition_to(&LoopState::AwaitingInput));
    }

    #[test]
    fn terminated_is_terminal() {
        assert!(LoopState::Terminated.is_terminal());
        assert!(!LoopState::Dispatching.can_transition_to(&LoopState::Terminated));
    }
}
