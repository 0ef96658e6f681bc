//! Configuration for the extraction pipeline

use eventlens_core::timezone::DEFAULT_UTC_OFFSET_HOURS;
use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the vision and date-extraction model calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Vision-capable model used to describe the image (e.g. "gpt-4o")
    pub vision_model: String,

    /// Text model used for the JSON-constrained extraction call
    pub text_model: String,

    /// Maximum tokens for model responses
    pub max_tokens: usize,

    /// UTC offset in hours used to interpret extracted wall-clock times
    pub utc_offset_hours: i32,

    /// HTTP timeout in seconds for model calls
    ///
    /// Model round-trips routinely take several seconds; keep this
    /// conservative (tens of seconds).
    pub http_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `EVENTLENS_VISION_MODEL`: vision model name (default: "gpt-4o")
    /// - `EVENTLENS_TEXT_MODEL`: extraction model name (default: "gpt-4o-mini")
    /// - `EVENTLENS_MAX_TOKENS`: max response tokens (default: 1000)
    /// - `EVENTLENS_UTC_OFFSET_HOURS`: interpretation offset (default: 9)
    /// - `EVENTLENS_HTTP_TIMEOUT_SECS`: model call timeout (default: 60)
    #[must_use = "creates config from environment variables"]
    pub fn from_env() -> Self {
        let vision_model =
            env::var("EVENTLENS_VISION_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        let text_model =
            env::var("EVENTLENS_TEXT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let max_tokens = env::var("EVENTLENS_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);

        let utc_offset_hours = env::var("EVENTLENS_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);

        let http_timeout_secs = env::var("EVENTLENS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        Self {
            vision_model,
            text_model,
            max_tokens,
            utc_offset_hours,
            http_timeout_secs,
        }
    }
}

impl Default for ExtractorConfig {
    #[inline]
    fn default() -> Self {
        Self {
            vision_model: "gpt-4o".to_string(),
            text_model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            http_timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.vision_model, "gpt-4o");
        assert_eq!(config.text_model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.utc_offset_hours, 9);
        assert_eq!(config.http_timeout_secs, 60);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("EVENTLENS_VISION_MODEL", "gpt-4o-2024-08-06");
        env::set_var("EVENTLENS_TEXT_MODEL", "gpt-4o");
        env::set_var("EVENTLENS_MAX_TOKENS", "2000");
        env::set_var("EVENTLENS_UTC_OFFSET_HOURS", "0");
        env::set_var("EVENTLENS_HTTP_TIMEOUT_SECS", "30");

        let config = ExtractorConfig::from_env();
        assert_eq!(config.vision_model, "gpt-4o-2024-08-06");
        assert_eq!(config.text_model, "gpt-4o");
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.utc_offset_hours, 0);
        assert_eq!(config.http_timeout_secs, 30);

        // Clean up
        env::remove_var("EVENTLENS_VISION_MODEL");
        env::remove_var("EVENTLENS_TEXT_MODEL");
        env::remove_var("EVENTLENS_MAX_TOKENS");
        env::remove_var("EVENTLENS_UTC_OFFSET_HOURS");
        env::remove_var("EVENTLENS_HTTP_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_config_from_env_ignores_unparseable_values() {
        env::set_var("EVENTLENS_MAX_TOKENS", "not-a-number");

        let config = ExtractorConfig::from_env();
        assert_eq!(config.max_tokens, 1000);

        env::remove_var("EVENTLENS_MAX_TOKENS");
    }
}
