//! InteractiveLoop - the read-query / dispatch / display cycle.
//!
//! Exactly one query is in flight at a time. Input arrives over a channel fed
//! by a dedicated reader, so the only suspension points are waiting for a
//! line, for the model and for the backend.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::dispatcher::ReasoningDispatcher;
use super::session::ToolBackendSession;
use crate::domain::extraction::{dedupe_preserving_order, DocumentReference, ResultExtractor};
use crate::domain::foundation::{RetrievalError, StateMachine};
use crate::domain::interaction::{classify_input, LoopInput, LoopState};
use crate::domain::reasoning::TurnBlock;
use crate::ports::{RetrievalPresenter, Stage};

/// Behavioral switches for the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSettings {
    /// Line that ends the loop, compared case-insensitively.
    pub quit_sentinel: String,
    /// Drop repeated references within one query's result.
    pub dedupe_references: bool,
    /// Re-discover tools before every dispatch.
    pub refresh_catalog_per_query: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            quit_sentinel: "quit".to_string(),
            dedupe_references: false,
            refresh_catalog_per_query: true,
        }
    }
}

/// Counts reported once the loop has terminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Queries dispatched (blank lines and the sentinel excluded).
    pub queries: usize,
    /// Queries that ended in an error.
    pub failures: usize,
}

/// Interactive retrieval loop. Owns the session for its whole life.
pub struct InteractiveLoop {
    session: ToolBackendSession,
    dispatcher: ReasoningDispatcher,
    extractor: ResultExtractor,
    presenter: Arc<dyn RetrievalPresenter>,
    input: mpsc::Receiver<String>,
    settings: LoopSettings,
    state: LoopState,
}

impl InteractiveLoop {
    pub fn new(
        session: ToolBackendSession,
        dispatcher: ReasoningDispatcher,
        presenter: Arc<dyn RetrievalPresenter>,
        input: mpsc::Receiver<String>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            session,
            dispatcher,
            extractor: ResultExtractor::new(),
            presenter,
            input,
            settings,
            state: LoopState::default(),
        }
    }

    /// Announces the session's tools, then runs until the sentinel or end of
    /// input, and finally closes the session.
    pub async fn run(mut self) -> LoopSummary {
        let mut summary = LoopSummary::default();
        if let Ok(catalog) = self.session.list_tools() {
            self.presenter.connected(catalog);
        }
        self.presenter.started(&self.settings.quit_sentinel);

        loop {
            self.presenter.prompt();

            let line = match self.input.recv().await {
                Some(line) => line,
                None => {
                    info!("Input closed, terminating loop");
                    break;
                }
            };

            let query = match classify_input(&line, &self.settings.quit_sentinel) {
                LoopInput::Empty => continue,
                LoopInput::Quit => {
                    info!("Quit sentinel received");
                    break;
                }
                LoopInput::Query(query) => query,
            };

            self.advance(LoopState::Dispatching);
            summary.queries += 1;

            match self.process(&query).await {
                Ok(references) => {
                    self.advance(LoopState::Displaying);
                    info!(references = references.len(), "Query completed");
                    self.presenter.references(&references);
                }
                Err(err) => {
                    summary.failures += 1;
                    warn!(kind = err.kind(), error = %err, "Query failed");
                    self.presenter.query_failed(&err);
                }
            }

            self.advance(LoopState::AwaitingInput);
        }

        self.advance(LoopState::Terminated);
        self.session.close().await;
        self.presenter.diagnostic(Stage::Teardown, "Session closed");
        info!(
            queries = summary.queries,
            failures = summary.failures,
            "Interactive loop terminated"
        );

        summary
    }

    /// One query: dispatch, run every requested tool, extract references.
    async fn process(&mut self, query: &str) -> Result<Vec<DocumentReference>, RetrievalError> {
        if self.settings.refresh_catalog_per_query {
            self.session.refresh_tools().await?;
            self.presenter
                .diagnostic(Stage::Discovery, "Refreshed tool catalog");
        }
        let catalog = self.session.list_tools()?;

        self.presenter.diagnostic(
            Stage::Dispatch,
            &format!("Asking the model with {} tool(s)", catalog.len()),
        );
        let turn = self.dispatcher.decide(query, catalog).await?;

        if !turn.has_tool_invocation() {
            warn!("Model did not invoke any tool; query yields no references");
            self.presenter.diagnostic(
                Stage::Dispatch,
                "The model did not call a tool, so there are no references for this query",
            );
        }

        let mut references = Vec::new();
        for block in turn.into_blocks() {
            match block {
                TurnBlock::PlainText(text) => {
                    debug!(text = %text, "Model text block");
                    self.presenter
                        .diagnostic(Stage::Dispatch, &format!("Model: {}", text));
                }
                TurnBlock::ToolInvocation(call) => {
                    info!(tool = call.name(), "Invoking tool");
                    self.presenter
                        .diagnostic(Stage::ToolCall, &format!("Calling {}", call));

                    let result = self.session.call_tool(&call).await?;
                    self.presenter
                        .diagnostic(Stage::ToolCall, &format!("Result: {}", result));

                    let found = self.extractor.extract(&result);
                    debug!(tool = call.name(), references = found.len(), "Extracted references");
                    self.presenter.diagnostic(
                        Stage::Extraction,
                        &format!("{} reference(s) from {}", found.len(), call.name()),
                    );
                    references.extend(found);
                }
            }
        }

        if self.settings.dedupe_references {
            references = dedupe_preserving_order(references);
        }

        Ok(references)
    }

    fn advance(&mut self, next: LoopState) {
        match self.state.transition_to(next) {
            Ok(state) => self.state = state,
            Err(e) => error!(error = %e, "Invalid interactive loop transition"),
        }
    }
}
