//! MCP protocol messages (JSON-RPC 2.0, newline-delimited).
//!
//! Only the client side of `initialize`, `tools/list` and `tools/call` is
//! modelled, plus enough of the envelope to route responses and ignore
//! everything else.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::tools::{ContentBlock, ToolCall, ToolCallResult, ToolDescriptor};
use crate::ports::{ClientInfo, ServerInfo, TransportError};

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision announced in the handshake.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC "method not found".
pub const METHOD_NOT_FOUND: i64 = -32601;

/// JSON-RPC "internal error", used when a response's error is not a valid object.
pub const INTERNAL_ERROR: i64 = -32603;

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// Outgoing request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params,
        }
    }
}

/// Outgoing notification (no id, no response).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.into(),
            params,
        }
    }
}

/// Error object of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<JsonRpcError> for TransportError {
    fn from(err: JsonRpcError) -> Self {
        TransportError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

/// A message read from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// Answer to one of our requests.
    Response {
        id: u64,
        outcome: Result<Value, JsonRpcError>,
    },
    /// Server-to-client notification (log messages, list changes, ...).
    Notification { method: String, params: Option<Value> },
    /// Server-to-client request. Not supported by this client.
    Request { id: Value, method: String },
}

/// Classifies one line of backend output.
pub fn parse_incoming(line: &str) -> Result<IncomingMessage, TransportError> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| TransportError::protocol(format!("invalid JSON from backend: {}", e)))?;

    let method = value.get("method").and_then(Value::as_str).map(str::to_string);
    let id = value.get("id").cloned().filter(|id| !id.is_null());

    match (method, id) {
        (Some(method), Some(id)) => Ok(IncomingMessage::Request { id, method }),
        (Some(method), None) => Ok(IncomingMessage::Notification {
            method,
            params: value.get("params").cloned(),
        }),
        (None, Some(id)) => {
            let id = id
                .as_u64()
                .ok_or_else(|| TransportError::protocol(format!("unexpected response id {}", id)))?;
            let outcome = match value.get("error") {
                Some(error) => Err(error_object(error)),
                None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
            };
            Ok(IncomingMessage::Response { id, outcome })
        }
        (None, None) => Err(TransportError::protocol(
            "message has neither method nor id".to_string(),
        )),
    }
}

/// Reads a response's error, falling back to an internal error carrying the
/// raw value so the waiting request still fails.
fn error_object(error: &Value) -> JsonRpcError {
    serde_json::from_value::<JsonRpcError>(error.clone()).unwrap_or_else(|_| JsonRpcError {
        code: INTERNAL_ERROR,
        message: match error {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
        data: None,
    })
}

/// Error reply to a server-initiated request we do not handle.
pub fn method_not_found_reply(id: &Value, method: &str) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": {
            "code": METHOD_NOT_FOUND,
            "message": format!("Method not supported by client: {}", method)
        }
    })
}

/// Params for `initialize`.
pub fn initialize_params(client: &ClientInfo) -> Value {
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {
            "name": client.name,
            "version": client.version
        }
    })
}

/// Params for `tools/list`.
pub fn tools_list_params(cursor: Option<&str>) -> Option<Value> {
    cursor.map(|cursor| json!({ "cursor": cursor }))
}

/// Params for `tools/call`.
pub fn tools_call_params(call: &ToolCall) -> Value {
    json!({
        "name": call.name(),
        "arguments": call.arguments_value()
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    #[serde(default)]
    protocol_version: String,
    #[serde(default)]
    server_info: Option<WireServerInfo>,
}

#[derive(Debug, Deserialize)]
struct WireServerInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

/// Parses the `initialize` result.
pub fn parse_initialize_result(result: Value) -> Result<ServerInfo, TransportError> {
    let parsed: InitializeResult = serde_json::from_value(result)
        .map_err(|e| TransportError::protocol(format!("malformed initialize result: {}", e)))?;
    let server = parsed.server_info.unwrap_or(WireServerInfo {
        name: String::new(),
        version: String::new(),
    });
    Ok(ServerInfo {
        name: server.name,
        version: server.version,
        protocol_version: parsed.protocol_version,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolsListResult {
    tools: Vec<WireTool>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTool {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "empty_object_schema")]
    input_schema: Value,
}

fn empty_object_schema() -> Value {
    json!({ "type": "object" })
}

/// One page of `tools/list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsPage {
    pub tools: Vec<ToolDescriptor>,
    pub next_cursor: Option<String>,
}

/// Parses one `tools/list` result page.
pub fn parse_tools_list_result(result: Value) -> Result<ToolsPage, TransportError> {
    let parsed: ToolsListResult = serde_json::from_value(result)
        .map_err(|e| TransportError::protocol(format!("malformed tools/list result: {}", e)))?;
    let tools = parsed
        .tools
        .into_iter()
        .map(|tool| {
            ToolDescriptor::new(tool.name, tool.description.unwrap_or_default(), tool.input_schema)
        })
        .collect();
    Ok(ToolsPage {
        tools,
        next_cursor: parsed.next_cursor.filter(|c| !c.is_empty()),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallToolResult {
    #[serde(default)]
    content: Vec<Value>,
    #[serde(default)]
    is_error: bool,
}

/// Parses a `tools/call` result.
pub fn parse_call_tool_result(result: Value) -> Result<ToolCallResult, TransportError> {
    let parsed: CallToolResult = serde_json::from_value(result)
        .map_err(|e| TransportError::protocol(format!("malformed tools/call result: {}", e)))?;
    let content = parsed.content.into_iter().map(content_block).collect();
    Ok(if parsed.is_error {
        ToolCallResult::error(content)
    } else {
        ToolCallResult::new(content)
    })
}

fn content_block(value: Value) -> ContentBlock {
    let is_text = value.get("type").and_then(Value::as_str) == Some("text");
    match value.get("text").and_then(Value::as_str) {
        Some(text) if is_text => ContentBlock::text(text),
        _ => ContentBlock::Other(value),
    }
}
