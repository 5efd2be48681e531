//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
///
/// Corresponds to the `[extractor]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum table text embedded in one prompt (characters)
    pub max_text_length: usize,

    /// Maximum time for a single completion attempt (seconds)
    pub extraction_timeout_secs: u64,

    /// Total completion attempts per scope, first one included
    pub max_retries: u32,

    /// Backoff before the second attempt; doubles for each further attempt
    pub retry_base_delay_ms: u64,

    /// PDF pages containing any of these substrings are never sent
    pub page_exclusions: Vec<String>,

    /// Drop fragments the reader did not flag as containing a table
    pub require_table: bool,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if self.page_exclusions.iter().any(|e| e.trim().is_empty()) {
            return Err("page_exclusions must not contain empty entries".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: 90_000,
            extraction_timeout_secs: 180,
            max_retries: 3,
            retry_base_delay_ms: 1_000,
            page_exclusions: vec!["功能分类".to_string()],
            require_table: true,
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_exclusions, vec!["功能分类"]);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ExtractorConfig::default();
        config.max_text_length = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.page_exclusions.push(" ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_is_exponential() {
        let config = ExtractorConfig::default();
        assert_eq!(config.retry_delay(1), Duration::from_millis(1_000));
        assert_eq!(config.retry_delay(2), Duration::from_millis(2_000));
        assert_eq!(config.retry_delay(3), Duration::from_millis(4_000));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            max_text_length: 50_000,
            extraction_timeout_secs: 300,
            retry_base_delay_ms: 2_000,
            page_exclusions: vec!["功能分类".to_string(), "部门预算".to_string()],
            ..ExtractorConfig::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed = ExtractorConfig::from_toml("max_text_length = 1000\nrequire_table = false").unwrap();
        assert_eq!(parsed.max_text_length, 1000);
        assert!(!parsed.require_table);
        assert_eq!(parsed.max_retries, 3);
    }
}
