//! Fiscal Extract Completion Provider Layer
//!
//! Pluggable text-completion providers behind the `CompletionProvider`
//! trait from `fiscal-domain`. The pipeline treats every provider as an
//! opaque, possibly failing text-in/text-out function.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: Any OpenAI-compatible chat-completions endpoint
//!
//! # Examples
//!
//! ```
//! use fiscal_llm::MockProvider;
//! use fiscal_domain::traits::CompletionProvider;
//!
//! let provider = MockProvider::new("全市-税收收入: 100");
//! let result = provider.complete("test prompt").unwrap();
//! assert_eq!(result, "全市-税收收入: 100");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod openai;

use fiscal_domain::traits::CompletionProvider;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use config::ProviderConfig;
pub use openai::OpenAiProvider;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code returned by the service
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Response envelope could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service signalled throttling or quota exhaustion
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The call did not finish in time
    #[error("Request timed out")]
    Timeout,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether repeating the same call may succeed
    ///
    /// Transport failures, timeouts, throttling and server-side (5xx)
    /// statuses are transient; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Communication(_) | LlmError::RateLimitExceeded | LlmError::Timeout => true,
            LlmError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the service signalled throttling, by variant or by a bare 429
    pub fn is_throttling(&self) -> bool {
        matches!(self, LlmError::RateLimitExceeded | LlmError::Http { status: 429, .. })
    }
}

/// Failure a [`MockProvider`] can be told to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// `LlmError::RateLimitExceeded`
    RateLimited,
    /// `LlmError::Timeout`
    Timeout,
    /// `LlmError::Communication`
    Communication,
    /// `LlmError::InvalidResponse`
    InvalidResponse,
}

impl MockFailure {
    fn to_error(self) -> LlmError {
        match self {
            MockFailure::RateLimited => LlmError::RateLimitExceeded,
            MockFailure::Timeout => LlmError::Timeout,
            MockFailure::Communication => LlmError::Communication("Mock connection reset".to_string()),
            MockFailure::InvalidResponse => LlmError::InvalidResponse("Mock malformed envelope".to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    exact: HashMap<String, String>,
    containing: Vec<(String, String)>,
    failures: VecDeque<MockFailure>,
    prompts: Vec<String>,
}

/// Mock completion provider for deterministic testing
///
/// Returns canned responses without making any network calls. Lookup order
/// for each call: queued failures, exact-prompt responses, substring rules
/// (first added wins), then the default response.
///
/// # Examples
///
/// ```
/// use fiscal_llm::{MockFailure, MockProvider};
/// use fiscal_domain::traits::CompletionProvider;
///
/// let provider = MockProvider::default();
/// provider.add_response_containing("政府性基金", "全市-政府性基金收入: 10");
/// provider.queue_failure(MockFailure::RateLimited);
///
/// assert!(provider.complete("重点关注政府性基金").is_err());
/// assert_eq!(provider.complete("重点关注政府性基金").unwrap(), "全市-政府性基金收入: 10");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state().exact.insert(prompt.into(), response.into());
    }

    /// Answer any prompt containing `needle` with `response`
    pub fn add_response_containing(&self, needle: impl Into<String>, response: impl Into<String>) {
        self.state().containing.push((needle.into(), response.into()));
    }

    /// Make the next call fail; queued failures are consumed in order
    pub fn queue_failure(&self, failure: MockFailure) {
        self.state().failures.push_back(failure);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    /// Forget received prompts
    pub fn reset_call_count(&self) {
        self.state().prompts.clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        if let Some(failure) = state.failures.pop_front() {
            return Err(failure.to_error());
        }

        if let Some(response) = state.exact.get(prompt) {
            return Ok(response.clone());
        }

        if let Some((_, response)) = state
            .containing
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
