//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DOC_RETRIEVAL` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use doc_retrieval::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend script: {:?}", config.backend.script_path);
//! ```

mod ai;
mod backend;
mod error;
mod retrieval;

pub use ai::{AiConfig, ANTHROPIC_API_KEY_ENV};
pub use backend::BackendConfig;
pub use error::{ConfigError, ValidationError};
pub use retrieval::RetrievalConfig;

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DOC_RETRIEVAL";

/// Root application configuration
///
/// Every section has defaults; only the script path and the API key must be
/// supplied, either through the environment or on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Tool backend launch configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Reasoning model configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Interactive loop configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DOC_RETRIEVAL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    /// 5. Falls back to `ANTHROPIC_API_KEY` when no prefixed key is set
    ///
    /// # Environment Variable Format
    ///
    /// - `DOC_RETRIEVAL__BACKEND__SCRIPT_PATH=server.py` -> `backend.script_path`
    /// - `DOC_RETRIEVAL__BACKEND__ARGS=--collection,docs` -> `backend.args` (comma separated)
    /// - `DOC_RETRIEVAL__AI__MAX_TOKENS=1000` -> `ai.max_tokens`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("backend.args"),
            )
            .build()?
            .try_deserialize()?;

        config.ai.apply_key_fallback(|name| std::env::var(name).ok());

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.backend.validate()?;
        self.ai.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("DOC_RETRIEVAL__BACKEND__SCRIPT_PATH", "server.py");
        env::set_var("DOC_RETRIEVAL__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        env::remove_var("DOC_RETRIEVAL__BACKEND__SCRIPT_PATH");
        env::remove_var("DOC_RETRIEVAL__BACKEND__ARGS");
        env::remove_var("DOC_RETRIEVAL__AI__ANTHROPIC_API_KEY");
        env::remove_var("DOC_RETRIEVAL__AI__MAX_TOKENS");
        env::remove_var("DOC_RETRIEVAL__RETRIEVAL__QUIT_SENTINEL");
        env::remove_var("DOC_RETRIEVAL__RETRIEVAL__DEDUPE_REFERENCES");
        env::remove_var(ANTHROPIC_API_KEY_ENV);
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.backend.script_path, Some(PathBuf::from("server.py")));
        assert_eq!(config.ai.model, "claude-3-5-sonnet-20241022");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DOC_RETRIEVAL__AI__MAX_TOKENS", "2048");
        env::set_var("DOC_RETRIEVAL__RETRIEVAL__QUIT_SENTINEL", "exit");
        env::set_var("DOC_RETRIEVAL__RETRIEVAL__DEDUPE_REFERENCES", "true");
        env::set_var("DOC_RETRIEVAL__BACKEND__ARGS", "--collection,docs");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.max_tokens, 2048);
        assert_eq!(config.retrieval.quit_sentinel, "exit");
        assert!(config.retrieval.dedupe_references);
        assert_eq!(config.backend.args, vec!["--collection", "docs"]);
    }

    #[test]
    fn test_plain_api_key_fallback() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DOC_RETRIEVAL__BACKEND__SCRIPT_PATH", "server.py");
        env::set_var(ANTHROPIC_API_KEY_ENV, "sk-ant-plain");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config
                .ai
                .anthropic_api_key
                .as_ref()
                .map(|k| k.expose_secret().as_str()),
            Some("sk-ant-plain")
        );
    }

    #[test]
    fn test_empty_environment_uses_defaults_but_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert!(config.backend.script_path.is_none());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
