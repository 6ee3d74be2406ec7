//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Reasoning model that picks a tool for a query
//! - `BackendLauncher` / `BackendTransport` - Tool-providing backend process
//! - `RetrievalPresenter` - Operator-facing output

mod ai_provider;
mod presenter;
mod tool_backend;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use presenter::{RetrievalPresenter, Stage};
pub use tool_backend::{BackendLauncher, BackendTransport, ClientInfo, ServerInfo, TransportError};
