//! Launcher that starts the backend as a local child process.

use async_trait::async_trait;

use super::stdio_transport::{StdioTimeouts, StdioTransport};
use crate::domain::session::LaunchSpec;
use crate::ports::{BackendLauncher, BackendTransport, TransportError};

/// Spawns `<interpreter> <script>` and talks MCP over its stdio.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    timeouts: StdioTimeouts,
}

impl ProcessLauncher {
    pub fn new(timeouts: StdioTimeouts) -> Self {
        Self { timeouts }
    }
}

#[async_trait]
impl BackendLauncher for ProcessLauncher {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn BackendTransport>, TransportError> {
        let transport = StdioTransport::spawn(spec, self.timeouts)?;
        Ok(Box::new(transport))
    }
}
