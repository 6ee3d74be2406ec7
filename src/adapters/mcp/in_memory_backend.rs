//! In-memory tool backend for testing.
//!
//! Implements both halves of the tool backend port without spawning a
//! process. Clones share state, so a test can keep a handle for assertions
//! after handing the backend to a launcher.
//!
//! # Example
//!
//! ```ignore
//! let backend = InMemoryBackend::new()
//!     .with_tool(descriptor, "Found it (File: guide.md)");
//! let launcher = MockLauncher::new(backend.clone());
//!
//! let session = ToolBackendSession::connect(&launcher, spec, &ClientInfo::default()).await?;
//! assert_eq!(backend.initialize_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::session::LaunchSpec;
use crate::domain::tools::{ContentBlock, ToolCall, ToolCallResult, ToolDescriptor};
use crate::ports::{BackendLauncher, BackendTransport, ClientInfo, ServerInfo, TransportError};

/// JSON-RPC "invalid params", used for unknown tool names.
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Default)]
struct BackendState {
    tools: Vec<ToolDescriptor>,
    responses: HashMap<String, ToolCallResult>,
    call_failures: HashMap<String, TransportError>,
    initialize_failure: Option<TransportError>,
    list_failure: Option<TransportError>,
    calls: Vec<ToolCall>,
    initialize_count: usize,
    list_count: usize,
    shutdown_count: usize,
    client: Option<ClientInfo>,
}

/// Scripted backend that answers from memory.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
    server: ServerInfo,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Creates a backend with no tools.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BackendState::default())),
            server: ServerInfo {
                name: "in-memory".to_string(),
                version: "0.0.0".to_string(),
                protocol_version: "2024-11-05".to_string(),
            },
        }
    }

    /// Registers a tool that answers every call with `response_text`.
    pub fn with_tool(self, descriptor: ToolDescriptor, response_text: impl Into<String>) -> Self {
        let result = ToolCallResult::text(response_text);
        self.with_tool_result(descriptor, result)
    }

    /// Registers a tool with a fully specified result.
    pub fn with_tool_result(self, descriptor: ToolDescriptor, result: ToolCallResult) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .responses
                .insert(descriptor.name().to_string(), result);
            state.tools.push(descriptor);
        }
        self
    }

    /// Registers a tool whose result is flagged as a tool error.
    pub fn with_failing_tool(self, descriptor: ToolDescriptor, message: impl Into<String>) -> Self {
        let result = ToolCallResult::error(vec![ContentBlock::text(message)]);
        self.with_tool_result(descriptor, result)
    }

    /// Makes calls to `tool` fail at the transport level.
    pub fn with_call_failure(self, tool: impl Into<String>, error: TransportError) -> Self {
        self.state
            .lock()
            .unwrap()
            .call_failures
            .insert(tool.into(), error);
        self
    }

    /// Makes the handshake fail.
    pub fn with_initialize_failure(self, error: TransportError) -> Self {
        self.state.lock().unwrap().initialize_failure = Some(error);
        self
    }

    /// Makes tool discovery fail.
    pub fn with_list_failure(self, error: TransportError) -> Self {
        self.state.lock().unwrap().list_failure = Some(error);
        self
    }

    /// Replaces the tool list served by later discoveries.
    pub fn replace_tools(&self, tools: Vec<(ToolDescriptor, String)>) {
        let mut state = self.state.lock().unwrap();
        state.tools.clear();
        state.responses.clear();
        for (descriptor, text) in tools {
            state
                .responses
                .insert(descriptor.name().to_string(), ToolCallResult::text(text));
            state.tools.push(descriptor);
        }
    }

    /// Tool calls received, in order.
    pub fn calls(&self) -> Vec<ToolCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn initialize_count(&self) -> usize {
        self.state.lock().unwrap().initialize_count
    }

    pub fn list_count(&self) -> usize {
        self.state.lock().unwrap().list_count
    }

    pub fn shutdown_count(&self) -> usize {
        self.state.lock().unwrap().shutdown_count
    }

    /// Client identity announced during the last handshake.
    pub fn announced_client(&self) -> Option<ClientInfo> {
        self.state.lock().unwrap().client.clone()
    }
}

#[async_trait]
impl BackendTransport for InMemoryBackend {
    async fn initialize(&self, client: &ClientInfo) -> Result<ServerInfo, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.initialize_count += 1;
        state.client = Some(client.clone());
        match &state.initialize_failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.server.clone()),
        }
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.list_count += 1;
        match &state.list_failure {
            Some(error) => Err(error.clone()),
            None => Ok(state.tools.clone()),
        }
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<ToolCallResult, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());

        if let Some(error) = state.call_failures.get(call.name()) {
            return Err(error.clone());
        }

        state
            .responses
            .get(call.name())
            .cloned()
            .ok_or_else(|| TransportError::Rpc {
                code: INVALID_PARAMS,
                message: format!("Unknown tool: {}", call.name()),
            })
    }

    async fn shutdown(&self) -> Result<(), TransportError> {
        self.state.lock().unwrap().shutdown_count += 1;
        Ok(())
    }
}

/// Launcher that hands out an [`InMemoryBackend`].
#[derive(Debug, Clone)]
pub struct MockLauncher {
    backend: InMemoryBackend,
    launch_failure: Option<TransportError>,
    launches: Arc<Mutex<Vec<LaunchSpec>>>,
}

impl MockLauncher {
    pub fn new(backend: InMemoryBackend) -> Self {
        Self {
            backend,
            launch_failure: None,
            launches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Makes every launch fail with `error`.
    pub fn with_launch_failure(mut self, error: TransportError) -> Self {
        self.launch_failure = Some(error);
        self
    }

    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }

    /// Specs passed to `launch`, in order.
    pub fn launches(&self) -> Vec<LaunchSpec> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendLauncher for MockLauncher {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn BackendTransport>, TransportError> {
        self.launches.lock().unwrap().push(spec.clone());
        if let Some(error) = &self.launch_failure {
            return Err(error.clone());
        }
        Ok(Box::new(self.backend.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_tool() -> ToolDescriptor {
        ToolDescriptor::new("search_docs", "Search documentation", json!({"type": "object"}))
    }

    #[tokio::test]
    async fn answers_registered_tool() {
        let backend = InMemoryBackend::new().with_tool(search_tool(), "hit (File: a.md)");
        let call = ToolCall::new("search_docs", Default::default());

        let result = backend.call_tool(&call).await.unwrap();

        assert_eq!(result.first_text(), Some("hit (File: a.md)"));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_is_rpc_error() {
        let backend = InMemoryBackend::new();
        let call = ToolCall::new("missing", Default::default());

        let err = backend.call_tool(&call).await.unwrap_err();

        assert_eq!(
            err,
            TransportError::Rpc {
                code: INVALID_PARAMS,
                message: "Unknown tool: missing".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failing_tool_returns_flagged_result() {
        let backend = InMemoryBackend::new().with_failing_tool(search_tool(), "index offline");
        let call = ToolCall::new("search_docs", Default::default());

        let result = backend.call_tool(&call).await.unwrap();

        assert!(result.is_error());
    }

    #[tokio::test]
    async fn clones_share_counters() {
        let backend = InMemoryBackend::new();
        let launcher = MockLauncher::new(backend.clone());

        let transport = launcher.launch(&LaunchSpec::new("server.py")).await.unwrap();
        transport.initialize(&ClientInfo::default()).await.unwrap();
        transport.shutdown().await.unwrap();

        assert_eq!(launcher.launch_count(), 1);
        assert_eq!(backend.initialize_count(), 1);
        assert_eq!(backend.shutdown_count(), 1);
    }

    #[tokio::test]
    async fn launch_failure_is_injected() {
        let launcher = MockLauncher::new(InMemoryBackend::new())
            .with_launch_failure(TransportError::Spawn("no python".to_string()));

        let result = launcher.launch(&LaunchSpec::new("server.py")).await;

        assert!(matches!(result, Err(TransportError::Spawn(_))));
        assert_eq!(launcher.launch_count(), 1);
    }
}
