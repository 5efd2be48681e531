//! Error types for the Extractor

use fiscal_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion provider error other than throttling or timeout
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// The completion service signalled rate or quota exhaustion
    #[error("Completion service throttled the request")]
    Throttled,

    /// Extraction timeout
    #[error("Extraction timeout")]
    Timeout,

    /// The document could not be read into fragments
    #[error("Read error: {0}")]
    Read(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether the failed completion call is worth repeating
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractorError::Llm(e) => e.is_retryable(),
            ExtractorError::Throttled | ExtractorError::Timeout => true,
            ExtractorError::Read(_) | ExtractorError::Config(_) => false,
        }
    }
}

impl From<LlmError> for ExtractorError {
    fn from(e: LlmError) -> Self {
        match e {
            e if e.is_throttling() => ExtractorError::Throttled,
            LlmError::Timeout => ExtractorError::Timeout,
            other => ExtractorError::Llm(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_mapping() {
        assert!(matches!(ExtractorError::from(LlmError::RateLimitExceeded), ExtractorError::Throttled));
        assert!(matches!(
            ExtractorError::from(LlmError::Http { status: 429, message: "quota".into() }),
            ExtractorError::Throttled
        ));
        assert!(matches!(ExtractorError::from(LlmError::Timeout), ExtractorError::Timeout));
        assert!(matches!(
            ExtractorError::from(LlmError::InvalidResponse("x".into())),
            ExtractorError::Llm(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_retryable() {
        assert!(ExtractorError::Throttled.is_retryable());
        assert!(ExtractorError::Timeout.is_retryable());
        assert!(ExtractorError::from(LlmError::Communication("reset".into())).is_retryable());
        assert!(!ExtractorError::from(LlmError::ModelNotAvailable("m".into())).is_retryable());
        assert!(!ExtractorError::Read("bad pdf".into()).is_retryable());
    }
}
