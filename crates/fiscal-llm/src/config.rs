//! Provider configuration

use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible base URL
pub const DEFAULT_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "doubao-1.5-pro-32k-250115";

/// Default sampling temperature (near-deterministic decoding)
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default per-request HTTP timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Settings for a remote completion provider
///
/// Corresponds to the `[llm]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// OpenAI-compatible base URL (without `/chat/completions`)
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Bearer token; requests are sent unauthenticated when absent
    pub api_key: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// HTTP timeout for one request (seconds)
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Check the configuration for obviously unusable values
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("llm.endpoint must not be empty".to_string());
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!("llm.endpoint must be an http(s) URL, got '{}'", self.endpoint));
        }
        if self.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("llm.temperature must be within 0.0..=2.0, got {}", self.temperature));
        }
        if self.request_timeout_secs == 0 {
            return Err("llm.request_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }

    /// Full URL of the chat-completions route
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}
