//! Presenter Port - Operator-facing output of the interactive loop.
//!
//! Keeps the loop free of direct stdout writes so it can be driven in tests
//! with a recording presenter.

use std::fmt;

use crate::domain::extraction::DocumentReference;
use crate::domain::foundation::RetrievalError;
use crate::domain::tools::ToolCatalog;

/// Stage a diagnostic line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Connect,
    Discovery,
    Dispatch,
    ToolCall,
    Extraction,
    Teardown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Connect => "connect",
            Stage::Discovery => "discovery",
            Stage::Dispatch => "dispatch",
            Stage::ToolCall => "tool call",
            Stage::Extraction => "extraction",
            Stage::Teardown => "teardown",
        };
        write!(f, "{}", s)
    }
}

/// Port for everything the operator sees.
pub trait RetrievalPresenter: Send + Sync {
    /// Session is ready; show the tools it offers.
    fn connected(&self, catalog: &ToolCatalog);

    /// Loop is about to start reading queries.
    fn started(&self, quit_sentinel: &str);

    /// About to wait for the next query.
    fn prompt(&self);

    /// Per-stage trace line.
    ///
    /// Purely informational: presenters may drop these.
    fn diagnostic(&self, stage: Stage, message: &str);

    /// Final result of one query (possibly empty).
    fn references(&self, references: &[DocumentReference]);

    /// A query failed; the loop continues.
    fn query_failed(&self, error: &RetrievalError);
}
