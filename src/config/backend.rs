//! Tool backend launch configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::session::LaunchSpec;

/// How to start the tool backend and talk to it
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Path to the backend script (may also come from `--script`)
    pub script_path: Option<PathBuf>,

    /// Interpreter that runs the script
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Extra arguments after the script path
    #[serde(default)]
    pub args: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Grace period for the backend to exit on shutdown, in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Client name announced in the handshake
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Client version announced in the handshake
    #[serde(default = "default_client_version")]
    pub client_version: String,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Builds the launch spec. Requires a script path.
    pub fn launch_spec(&self) -> Result<LaunchSpec, ValidationError> {
        let script = self
            .script_path
            .as_ref()
            .ok_or(ValidationError::MissingRequired("backend.script_path (or --script)"))?;

        Ok(LaunchSpec::new(script.clone())
            .with_interpreter(self.interpreter.clone())
            .with_args(self.args.clone()))
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let spec = self.launch_spec()?;
        spec.validate()
            .map_err(|e| ValidationError::UnsupportedScript(e.to_string()))?;

        if self.interpreter.trim().is_empty() {
            return Err(ValidationError::MissingRequired("backend.interpreter"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("backend.request_timeout_secs"));
        }
        if self.shutdown_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("backend.shutdown_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            script_path: None,
            interpreter: default_interpreter(),
            args: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_request_timeout() -> u64 {
    180
}

fn default_shutdown_timeout() -> u64 {
    5
}

fn default_client_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_script(path: &str) -> BackendConfig {
        BackendConfig {
            script_path: Some(PathBuf::from(path)),
            ..Default::default()
        }
    }

    #[test]
    fn test_backend_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.interpreter, "python3");
        assert!(config.args.is_empty());
        assert_eq!(config.request_timeout(), Duration::from_secs(180));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.client_name, "doc-retrieval");
    }

    #[test]
    fn test_missing_script_is_required() {
        assert!(matches!(
            BackendConfig::default().validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_wrong_extension_fails_validation() {
        assert!(matches!(
            with_script("server.sh").validate(),
            Err(ValidationError::UnsupportedScript(_))
        ));
    }

    #[test]
    fn test_launch_spec_carries_interpreter_and_args() {
        let config = BackendConfig {
            interpreter: "/usr/bin/python3.11".to_string(),
            args: vec!["--port".to_string(), "0".to_string()],
            ..with_script("server.py")
        };

        let spec = config.launch_spec().unwrap();

        assert_eq!(spec.interpreter(), "/usr/bin/python3.11");
        assert_eq!(spec.command_args(), vec!["server.py", "--port", "0"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = BackendConfig {
            request_timeout_secs: 0,
            ..with_script("server.py")
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTimeout("backend.request_timeout_secs"))
        );
    }
}
