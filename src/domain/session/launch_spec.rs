//! Launch target for a tool backend process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::foundation::ConnectionError;

/// The only script extension accepted as a backend launch target.
pub const ACCEPTED_SCRIPT_EXTENSION: &str = "py";

/// Describes how to start a backend: `<interpreter> <script> [args...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    /// Interpreter used to run the script.
    interpreter: String,
    /// Path to the backend script.
    script_path: PathBuf,
    /// Extra arguments passed after the script path.
    args: Vec<String>,
}

impl LaunchSpec {
    /// Creates a launch spec for the given script using `python3`.
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: "python3".to_string(),
            script_path: script_path.into(),
            args: Vec::new(),
        }
    }

    /// Sets the interpreter.
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Sets extra arguments.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Returns the interpreter.
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Returns the script path.
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Returns the extra arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full argument vector for the interpreter: the script followed by extras.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.script_path.to_string_lossy().into_owned());
        args.extend(self.args.iter().cloned());
        args
    }

    /// Checks the script extension before anything is spawned.
    pub fn validate(&self) -> Result<(), ConnectionError> {
        let accepted = self
            .script_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == ACCEPTED_SCRIPT_EXTENSION);

        if accepted {
            Ok(())
        } else {
            Err(ConnectionError::unsupported_script(
                self.script_path.to_string_lossy(),
                ACCEPTED_SCRIPT_EXTENSION,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_script_is_accepted() {
        assert!(LaunchSpec::new("/srv/backend/stdio_server.py").validate().is_ok());
    }

    #[test]
    fn other_extensions_are_rejected() {
        for path in ["server.js", "server.pyc", "server", "server.py.bak", "server.PY"] {
            let err = LaunchSpec::new(path).validate().unwrap_err();
            assert!(
                matches!(err, ConnectionError::UnsupportedScript { .. }),
                "{} should be rejected",
                path
            );
        }
    }

    #[test]
    fn command_args_put_script_first() {
        let spec = LaunchSpec::new("server.py")
            .with_interpreter("/usr/bin/python3.12")
            .with_args(vec!["--collection".to_string(), "docs".to_string()]);

        assert_eq!(spec.interpreter(), "/usr/bin/python3.12");
        assert_eq!(spec.command_args(), vec!["server.py", "--collection", "docs"]);
    }
}
