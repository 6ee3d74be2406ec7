//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Reasoning model providers (Anthropic, mock)
//! - `mcp` - Tool backends spoken to over MCP (stdio process, in-memory)
//! - `console` - Operator input and output

pub mod ai;
pub mod console;
pub mod mcp;

pub use ai::{AnthropicConfig, AnthropicProvider, MockAIProvider};
pub use console::{spawn_line_reader, spawn_stdin_reader, ConsolePresenter};
pub use mcp::{InMemoryBackend, MockLauncher, ProcessLauncher, StdioTimeouts, StdioTransport};
