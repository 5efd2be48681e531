//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document source error (scan or read)
    #[error(transparent)]
    Source(#[from] fiscal_sources::SourceError),

    /// Pipeline error
    #[error("Extraction error: {0}")]
    Extractor(#[from] fiscal_extractor::ExtractorError),

    /// Completion provider error
    #[error("Provider error: {0}")]
    Llm(#[from] fiscal_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Unknown output encoding label
    #[error("Unknown output encoding: {0}")]
    Encoding(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
