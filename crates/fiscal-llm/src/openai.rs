//! OpenAI-compatible Provider Implementation
//!
//! Talks to any service exposing the `/chat/completions` route (hosted
//! gateways, vLLM, llama.cpp server, ...). One call is one request: retry
//! and backoff belong to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use fiscal_llm::{OpenAiProvider, ProviderConfig};
//!
//! let provider = OpenAiProvider::new(ProviderConfig {
//!     api_key: Some("sk-...".into()),
//!     ..ProviderConfig::default()
//! })
//! .unwrap();
//!
//! // `complete` is async; the `CompletionProvider` trait offers a blocking wrapper
//! ```

use crate::{LlmError, ProviderConfig};
use fiscal_domain::traits::CompletionProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Chat-completions provider
pub struct OpenAiProvider {
    config: ProviderConfig,
    url: String,
    client: reqwest::Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response envelope; only the fields we read
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider from its configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Other)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: config.completions_url(),
            config,
            client,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Send one chat-completion request
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded` on HTTP 429
    /// - `ModelNotAvailable` on HTTP 404
    /// - `Http` on any other non-success status
    /// - `Timeout` when the HTTP timeout fires
    /// - `Communication` on other transport failures
    /// - `InvalidResponse` when the envelope has no usable content
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.config.temperature,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "Sending completion request");

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_content(envelope)
    }
}

fn map_transport_error(error: reqwest::Error) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Communication(format!("Request failed: {}", error))
    }
}

fn extract_content(envelope: ChatResponse) -> Result<String, LlmError> {
    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no message content".to_string()))
}

impl CompletionProvider for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper; callers run this on a blocking thread
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
        runtime.block_on(OpenAiProvider::complete(self, prompt))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new(ProviderConfig {
            endpoint: "http://localhost:8000/v1".into(),
            model: "qwen2.5-7b".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.url, "http://localhost:8000/v1/chat/completions");
        assert_eq!(CompletionProvider::model_name(&provider), "qwen2.5-7b");
    }

    #[test]
    fn test_provider_rejects_invalid_config() {
        let result = OpenAiProvider::new(ProviderConfig { endpoint: String::new(), ..Default::default() });
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "m",
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            temperature: 0.1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert!((json["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_extract_content() {
        let envelope: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"全市-契税: 12"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(envelope).unwrap(), "全市-契税: 12");
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let envelope: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_content(envelope), Err(LlmError::InvalidResponse(_))));

        let envelope: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
        assert!(matches!(extract_content(envelope), Err(LlmError::InvalidResponse(_))));
    }

    // Integration test - only runs against a live service
    #[tokio::test]
    #[ignore]
    async fn test_live_completion() {
        let config = ProviderConfig {
            api_key: std::env::var("FISCAL_API_KEY").ok(),
            ..Default::default()
        };
        let provider = OpenAiProvider::new(config).unwrap();
        let result = provider.complete("请只回复: 全市-税收收入: 1.00").await;
        assert!(result.is_ok(), "Completion failed: {:?}", result.err());
    }
}
