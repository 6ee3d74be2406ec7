//! Reasoning model configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Plain environment variable consulted when the prefixed key is absent.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Reasoning model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key
    pub anthropic_api_key: Option<Secret<String>>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Token budget per model call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an Anthropic key is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Fills a missing key from `ANTHROPIC_API_KEY`.
    pub fn apply_key_fallback(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if !self.has_anthropic() {
            if let Some(key) = lookup(ANTHROPIC_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
                self.anthropic_api_key = Some(Secret::new(key));
            }
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_anthropic() {
            return Err(ValidationError::MissingRequired(ANTHROPIC_API_KEY_ENV));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ai.model"));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai.timeout_secs"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AiConfig {
        AiConfig {
            anthropic_api_key: Some(Secret::new("sk-ant-xxx".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(!config.has_anthropic());
    }

    #[test]
    fn test_validation_requires_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = AiConfig {
            anthropic_api_key: Some(Secret::new("  ".to_string())),
            ..Default::default()
        };
        assert!(!config.has_anthropic());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_budget() {
        let config = AiConfig {
            max_tokens: 0,
            ..with_key()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxTokens));
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let config = AiConfig {
            base_url: "api.anthropic.com".to_string(),
            ..with_key()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_key_fallback_fills_missing_key() {
        let mut config = AiConfig::default();
        config.apply_key_fallback(|name| {
            assert_eq!(name, ANTHROPIC_API_KEY_ENV);
            Some("sk-ant-fallback".to_string())
        });
        assert_eq!(
            config.anthropic_api_key.unwrap().expose_secret(),
            "sk-ant-fallback"
        );
    }

    #[test]
    fn test_key_fallback_keeps_configured_key() {
        let mut config = with_key();
        config.apply_key_fallback(|_| Some("other".to_string()));
        assert_eq!(
            config.anthropic_api_key.unwrap().expose_secret(),
            "sk-ant-xxx"
        );
    }
}
