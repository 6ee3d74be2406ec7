//! MCP tool backend adapters.
//!
//! - `ProcessLauncher` / `StdioTransport` - real backend over child stdio
//! - `InMemoryBackend` / `MockLauncher` - scripted backend for tests

mod in_memory_backend;
mod process_launcher;
mod protocol;
mod stdio_transport;

pub use in_memory_backend::{InMemoryBackend, MockLauncher};
pub use process_launcher::ProcessLauncher;
pub use protocol::MCP_PROTOCOL_VERSION;
pub use stdio_transport::{StdioTimeouts, StdioTransport};
