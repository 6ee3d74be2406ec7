//! Tool Backend Port - Interface to an external tool-providing process.
//!
//! Split in two so launching can be observed independently of talking:
//!
//! - `BackendLauncher` turns a [`LaunchSpec`] into a live transport
//! - `BackendTransport` speaks the tool protocol over that transport
//!
//! The session in the application layer owns exactly one transport and is
//! responsible for calling [`BackendTransport::shutdown`] on every exit path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::session::LaunchSpec;
use crate::domain::tools::{ToolCall, ToolCallResult, ToolDescriptor};

/// Port for starting a backend process.
#[async_trait]
pub trait BackendLauncher: Send + Sync {
    /// Start (or attach to) the backend described by `spec`.
    ///
    /// Implementations may assume `spec` has already been validated.
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn BackendTransport>, TransportError>;
}

/// Port for the tool protocol spoken with a running backend.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    /// Protocol handshake. Must be the first call.
    async fn initialize(&self, client: &ClientInfo) -> Result<ServerInfo, TransportError>;

    /// Discover tools, following pagination, in backend order.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, TransportError>;

    /// Invoke one tool and wait for its result.
    ///
    /// A result the tool itself flagged as an error is returned as `Ok`
    /// with [`ToolCallResult::is_error`] set.
    async fn call_tool(&self, call: &ToolCall) -> Result<ToolCallResult, TransportError>;

    /// Release the protocol session, streams and process.
    ///
    /// Callers guarantee a single invocation.
    async fn shutdown(&self) -> Result<(), TransportError>;
}

/// Identity this client announces during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

impl ClientInfo {
    /// Creates client info.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// What the backend reported about itself during the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
}

/// Transport-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to spawn backend: {0}")]
    Spawn(String),

    #[error("backend i/o error: {0}")]
    Io(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    /// The backend answered with a JSON-RPC error object.
    #[error("backend error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("request '{method}' timed out after {timeout_secs}s")]
    Timeout { method: String, timeout_secs: u64 },

    #[error("transport is closed")]
    Closed,
}

impl TransportError {
    /// Creates an i/o error.
    pub fn io(message: impl Into<String>) -> Self {
        TransportError::Io(message.into())
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        TransportError::Protocol(message.into())
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}
