//! ToolBackendSession - one long-lived connection to a tool backend.
//!
//! Owns the transport exclusively. Every path out of a session, whether a
//! failed handshake, an explicit close or loop termination, goes through a
//! single `shutdown` of that transport.

use tracing::{debug, info, warn};

use crate::domain::foundation::{
    ConnectionError, RetrievalError, SessionError, StateMachine, ToolInvocationError,
};
use crate::domain::session::{LaunchSpec, SessionState};
use crate::domain::tools::{ToolCall, ToolCallResult, ToolCatalog};
use crate::ports::{BackendLauncher, BackendTransport, ClientInfo, ServerInfo, TransportError};

/// A connected backend session.
pub struct ToolBackendSession {
    transport: Option<Box<dyn BackendTransport>>,
    state: SessionState,
    catalog: ToolCatalog,
    server: ServerInfo,
    launch_spec: LaunchSpec,
}

impl std::fmt::Debug for ToolBackendSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBackendSession")
            .field("state", &self.state)
            .field("tools", &self.catalog.names())
            .field("server", &self.server)
            .field("script", &self.launch_spec.script_path())
            .finish()
    }
}

impl ToolBackendSession {
    /// Launches the backend, performs the handshake and discovers tools.
    ///
    /// The launch target is checked before the launcher is touched, so an
    /// unsupported script never spawns anything. If the handshake or discovery
    /// fails, the transport is shut down before the error is returned.
    pub async fn connect(
        launcher: &dyn BackendLauncher,
        spec: LaunchSpec,
        client: &ClientInfo,
    ) -> Result<Self, ConnectionError> {
        spec.validate()?;

        let mut state = SessionState::Disconnected;
        state = advance(state, SessionState::Connecting);

        info!(script = %spec.script_path().display(), interpreter = spec.interpreter(), "Launching tool backend");
        let transport = launcher
            .launch(&spec)
            .await
            .map_err(|e| ConnectionError::launch(e.to_string()))?;

        match handshake(transport.as_ref(), client).await {
            Ok((server, catalog)) => {
                state = advance(state, SessionState::Ready);
                info!(
                    server = %server.name,
                    server_version = %server.version,
                    protocol = %server.protocol_version,
                    tools = catalog.len(),
                    "Tool backend session ready"
                );
                Ok(Self {
                    transport: Some(transport),
                    state,
                    catalog,
                    server,
                    launch_spec: spec,
                })
            }
            Err(err) => {
                warn!(error = %err, "Backend handshake failed, tearing down");
                if let Err(shutdown_err) = transport.shutdown().await {
                    warn!(error = %shutdown_err, "Teardown after failed handshake also failed");
                }
                Err(err)
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// What the backend reported during the handshake.
    pub fn server_info(&self) -> &ServerInfo {
        &self.server
    }

    pub fn launch_spec(&self) -> &LaunchSpec {
        &self.launch_spec
    }

    /// The cached tool catalog.
    pub fn list_tools(&self) -> Result<&ToolCatalog, SessionError> {
        self.ready_transport("list tools")?;
        Ok(&self.catalog)
    }

    /// Re-runs discovery and replaces the cached catalog.
    ///
    /// On failure the previous catalog is kept and the session stays Ready.
    pub async fn refresh_tools(&mut self) -> Result<&ToolCatalog, SessionError> {
        let transport = self.ready_transport("refresh tools")?;
        let tools = transport
            .list_tools()
            .await
            .map_err(|e| SessionError::discovery(e.to_string()))?;

        self.catalog = ToolCatalog::new(tools);
        debug!(tools = ?self.catalog.names(), "Refreshed tool catalog");
        Ok(&self.catalog)
    }

    /// Invokes one tool.
    ///
    /// Names are not checked against the catalog here; the backend is the
    /// authority and its rejection surfaces as [`ToolInvocationError`]. No
    /// invocation failure changes the session state.
    pub async fn call_tool(&self, call: &ToolCall) -> Result<ToolCallResult, RetrievalError> {
        let transport = self.ready_transport("call tool")?;

        if !self.catalog.contains(call.name()) {
            debug!(tool = call.name(), "Calling a tool that is not in the current catalog");
        }

        let result = transport
            .call_tool(call)
            .await
            .map_err(|e| invocation_error(call.name(), e))?;

        if result.is_error() {
            return Err(ToolInvocationError::ToolReported {
                tool: call.name().to_string(),
                message: result.joined_text(),
            }
            .into());
        }

        Ok(result)
    }

    /// Releases the backend. Idempotent and callable in any state.
    ///
    /// Only the first call reaches the transport.
    pub async fn close(&mut self) {
        if self.state.is_closed() {
            debug!("Session already closed");
            return;
        }
        self.state = advance(self.state, SessionState::Closed);

        if let Some(transport) = self.transport.take() {
            info!("Closing tool backend session");
            if let Err(e) = transport.shutdown().await {
                warn!(error = %e, "Backend shutdown reported an error");
            }
        }
    }

    fn ready_transport(&self, operation: &'static str) -> Result<&dyn BackendTransport, SessionError> {
        match (self.state, self.transport.as_deref()) {
            (SessionState::Ready, Some(transport)) => Ok(transport),
            (SessionState::Closed, _) => Err(SessionError::closed(operation)),
            (state, _) => Err(SessionError::not_ready(operation, state)),
        }
    }
}

/// `initialize` then `tools/list`.
async fn handshake(
    transport: &dyn BackendTransport,
    client: &ClientInfo,
) -> Result<(ServerInfo, ToolCatalog), ConnectionError> {
    let server = transport
        .initialize(client)
        .await
        .map_err(|e| ConnectionError::handshake(e.to_string()))?;

    let tools = transport
        .list_tools()
        .await
        .map_err(|e| ConnectionError::handshake(format!("tool discovery failed: {}", e)))?;

    Ok((server, ToolCatalog::new(tools)))
}

/// Applies a transition that is valid by construction.
fn advance(from: SessionState, to: SessionState) -> SessionState {
    debug_assert!(
        from.can_transition_to(&to),
        "invalid session transition from {} to {}",
        from,
        to
    );
    to
}

fn invocation_error(tool: &str, err: TransportError) -> RetrievalError {
    let tool = tool.to_string();
    let err = match err {
        TransportError::Rpc { code, message } => ToolInvocationError::Rejected {
            tool,
            message: format!("{} (code {})", message, code),
        },
        other => ToolInvocationError::Transport {
            tool,
            message: other.to_string(),
        },
    };
    err.into()
}
