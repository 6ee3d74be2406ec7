//! Interactive loop behavior

use serde::Deserialize;

use super::error::ValidationError;

/// Interactive loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Input line that ends the session (case-insensitive)
    #[serde(default = "default_quit_sentinel")]
    pub quit_sentinel: String,

    /// Remove repeated references from a query's result
    #[serde(default)]
    pub dedupe_references: bool,

    /// Re-discover tools before every query
    #[serde(default = "default_refresh")]
    pub refresh_catalog_per_query: bool,
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quit_sentinel.trim().is_empty() {
            return Err(ValidationError::EmptyQuitSentinel);
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            quit_sentinel: default_quit_sentinel(),
            dedupe_references: false,
            refresh_catalog_per_query: default_refresh(),
        }
    }
}

fn default_quit_sentinel() -> String {
    "quit".to_string()
}

fn default_refresh() -> bool {
    true
}
