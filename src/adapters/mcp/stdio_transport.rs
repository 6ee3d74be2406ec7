//! MCP stdio transport - JSON-RPC over a child process's stdin/stdout.
//!
//! A background reader task owns stdout, routes responses to waiting
//! requests by id, logs notifications and refuses server-initiated requests.
//! Resources are acquired as process, then streams, then protocol session,
//! and released in the reverse order by [`StdioTransport::shutdown`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::protocol::{
    initialize_params, method_not_found_reply, parse_call_tool_result, parse_incoming,
    parse_initialize_result, parse_tools_list_result, tools_call_params, tools_list_params,
    IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest, METHOD_INITIALIZE,
    METHOD_INITIALIZED, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
};
use crate::domain::session::LaunchSpec;
use crate::domain::tools::{ToolCall, ToolCallResult, ToolDescriptor};
use crate::ports::{BackendTransport, ClientInfo, ServerInfo, TransportError};

/// Request/response waiter.
type ResponseWaiter = oneshot::Sender<Result<Value, JsonRpcError>>;

/// Requests awaiting a response, keyed by JSON-RPC id.
///
/// `closed` is set once the backend's stdout is gone; no waiter is
/// registered after that.
#[derive(Default)]
struct Pending {
    waiters: HashMap<u64, ResponseWaiter>,
    closed: bool,
}

impl Pending {
    fn close(&mut self) {
        self.closed = true;
        // Dropping the waiters wakes every in-flight request with `Closed`.
        self.waiters.clear();
    }
}

type PendingRequests = Arc<Mutex<Pending>>;

/// Shared handle to the child's stdin; `None` once closed.
type SharedStdin = Arc<Mutex<Option<ChildStdin>>>;

/// Upper bound on `tools/list` pages followed in one discovery.
const MAX_TOOL_PAGES: usize = 100;

/// Timeouts applied by the transport.
#[derive(Debug, Clone, Copy)]
pub struct StdioTimeouts {
    /// Per-request wait for a response.
    pub request: Duration,
    /// Grace period for the process to exit after stdin closes.
    pub shutdown: Duration,
}

impl Default for StdioTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(180),
            shutdown: Duration::from_secs(5),
        }
    }
}

/// MCP client transport over a spawned process.
pub struct StdioTransport {
    child: Mutex<Option<Child>>,
    stdin: SharedStdin,
    reader: Mutex<Option<JoinHandle<()>>>,
    pending: PendingRequests,
    next_id: AtomicU64,
    timeouts: StdioTimeouts,
}

impl StdioTransport {
    /// Spawns `<interpreter> <script> [args...]` with piped stdio.
    ///
    /// The backend's stderr is inherited so its own logs stay visible.
    pub fn spawn(spec: &LaunchSpec, timeouts: StdioTimeouts) -> Result<Self, TransportError> {
        let mut child = Command::new(spec.interpreter())
            .args(spec.command_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                TransportError::Spawn(format!(
                    "{} {}: {}",
                    spec.interpreter(),
                    spec.script_path().display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::Spawn("backend stdin was not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::Spawn("backend stdout was not captured".to_string()))?;

        info!(
            pid = child.id(),
            script = %spec.script_path().display(),
            "Spawned MCP backend"
        );

        let stdin: SharedStdin = Arc::new(Mutex::new(Some(stdin)));
        let pending: PendingRequests = Arc::new(Mutex::new(Pending::default()));

        let reader = tokio::spawn(Self::handle_messages(
            stdout,
            Arc::clone(&pending),
            Arc::clone(&stdin),
        ));

        Ok(Self {
            child: Mutex::new(Some(child)),
            stdin,
            reader: Mutex::new(Some(reader)),
            pending,
            next_id: AtomicU64::new(1),
            timeouts,
        })
    }

    /// Reads backend output until EOF.
    async fn handle_messages(stdout: ChildStdout, pending: PendingRequests, stdin: SharedStdin) {
        let mut lines = BufReader::new(stdout).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("MCP backend closed stdout");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read from MCP backend");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match parse_incoming(&line) {
                Ok(IncomingMessage::Response { id, outcome }) => {
                    let waiter = pending.lock().await.waiters.remove(&id);
                    match waiter {
                        Some(waiter) => {
                            let _ = waiter.send(outcome);
                        }
                        None => warn!("Received response for unknown request ID: {}", id),
                    }
                }
                Ok(IncomingMessage::Notification { method, params }) => {
                    debug!(method = %method, params = ?params, "Received MCP notification");
                }
                Ok(IncomingMessage::Request { id, method }) => {
                    warn!(method = %method, "Refusing server-initiated MCP request");
                    let reply = method_not_found_reply(&id, &method);
                    if let Err(e) = write_line(&stdin, &reply).await {
                        warn!(error = %e, "Failed to answer server-initiated request");
                    }
                }
                Err(e) => {
                    warn!(error = %e, line = %line, "Ignoring unparseable backend output");
                }
            }
        }

        pending.lock().await.close();
    }

    /// Sends a request and waits for the response.
    async fn send_request_and_wait(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if pending.closed {
                return Err(TransportError::Closed);
            }
            pending.waiters.insert(id, tx);
        }

        let request = JsonRpcRequest::new(id, method, params);
        if let Err(e) = write_line(&self.stdin, &request).await {
            self.pending.lock().await.waiters.remove(&id);
            return Err(e);
        }
        debug!(id, method, "Sent MCP request");

        match tokio::time::timeout(self.timeouts.request, rx).await {
            Ok(Ok(Ok(result))) => Ok(result),
            Ok(Ok(Err(error))) => Err(error.into()),
            Ok(Err(_)) => Err(TransportError::Closed),
            Err(_) => {
                self.pending.lock().await.waiters.remove(&id);
                Err(TransportError::Timeout {
                    method: method.to_string(),
                    timeout_secs: self.timeouts.request.as_secs(),
                })
            }
        }
    }

    /// Sends a notification.
    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), TransportError> {
        write_line(&self.stdin, &JsonRpcNotification::new(method, params)).await
    }

    /// Waits for the process to exit, killing it after the grace period.
    async fn reap(&self, mut child: Child) -> Result<(), TransportError> {
        match tokio::time::timeout(self.timeouts.shutdown, child.wait()).await {
            Ok(Ok(status)) => {
                debug!(%status, "MCP backend exited");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                warn!(
                    grace_secs = self.timeouts.shutdown.as_secs(),
                    "MCP backend did not exit after stdin closed, killing"
                );
                child.kill().await?;
                Ok(())
            }
        }
    }
}

/// Serializes `message` as one line on the backend's stdin.
async fn write_line<T: Serialize>(stdin: &SharedStdin, message: &T) -> Result<(), TransportError> {
    let mut line = serde_json::to_vec(message)
        .map_err(|e| TransportError::protocol(format!("failed to encode message: {}", e)))?;
    line.push(b'\n');

    let mut guard = stdin.lock().await;
    let writer = guard.as_mut().ok_or(TransportError::Closed)?;
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

#[async_trait]
impl BackendTransport for StdioTransport {
    async fn initialize(&self, client: &ClientInfo) -> Result<ServerInfo, TransportError> {
        let result = self
            .send_request_and_wait(METHOD_INITIALIZE, Some(initialize_params(client)))
            .await?;
        let server = parse_initialize_result(result)?;
        self.notify(METHOD_INITIALIZED, None).await?;
        Ok(server)
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, TransportError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_TOOL_PAGES {
            let result = self
                .send_request_and_wait(METHOD_TOOLS_LIST, tools_list_params(cursor.as_deref()))
                .await?;
            let page = parse_tools_list_result(result)?;
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(tools),
            }
        }

        Err(TransportError::protocol(format!(
            "tools/list did not finish within {} pages",
            MAX_TOOL_PAGES
        )))
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<ToolCallResult, TransportError> {
        debug!("Calling MCP tool: name={}", call.name());
        let result = self
            .send_request_and_wait(METHOD_TOOLS_CALL, Some(tools_call_params(call)))
            .await?;
        parse_call_tool_result(result)
    }

    async fn shutdown(&self) -> Result<(), TransportError> {
        // Protocol session: fail anything still waiting.
        self.pending.lock().await.close();

        // Streams: closing stdin is the MCP stdio shutdown signal.
        if let Some(mut stdin) = self.stdin.lock().await.take() {
            let _ = stdin.shutdown().await;
        }

        let child = self.child.lock().await.take();
        let result = match child {
            Some(child) => self.reap(child).await,
            None => Ok(()),
        };

        if let Some(reader) = self.reader.lock().await.take() {
            reader.abort();
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let timeouts = StdioTimeouts::default();
        assert_eq!(timeouts.request, Duration::from_secs(180));
        assert_eq!(timeouts.shutdown, Duration::from_secs(5));
    }

    #[test]
    fn closing_pending_wakes_waiters_and_marks_closed() {
        let mut pending = Pending::default();
        let (tx, mut rx) = oneshot::channel();
        pending.waiters.insert(1, tx);

        pending.close();

        assert!(pending.closed);
        assert!(pending.waiters.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn spawn_reports_missing_interpreter() {
        let spec = LaunchSpec::new("server.py")
            .with_interpreter("/nonexistent/interpreter-for-doc-retrieval-tests");
        let err = StdioTransport::spawn(&spec, StdioTimeouts::default())
            .err()
            .expect("spawn should fail");
        assert!(matches!(err, TransportError::Spawn(_)));
    }
}
