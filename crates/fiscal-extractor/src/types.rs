//! Result types for extraction

use fiscal_domain::{DomainScope, ExtractionRecord};
use std::path::PathBuf;

/// Outcome of running every scope over one document
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    /// Document the fragments came from
    pub document: PathBuf,

    /// Scope records combined with max-wins
    pub record: ExtractionRecord,

    /// Scopes whose completion call failed
    pub failures: Vec<ScopeFailure>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

impl DocumentExtraction {
    /// True if at least one scope failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// A scope that contributed nothing because its completion call failed
#[derive(Debug, Clone)]
pub struct ScopeFailure {
    /// Scope that failed
    pub scope: DomainScope,

    /// Rendered error of the last attempt
    pub reason: String,

    /// Attempts made before giving up
    pub attempts: u32,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, Default)]
pub struct ExtractionMetadata {
    /// Name of the model used
    pub model_name: String,

    /// Scopes with at least one relevant fragment
    pub scopes_attempted: usize,

    /// Completion calls issued, retries included
    pub completion_calls: u32,

    /// Whether any prompt had its table text cut at the length limit
    pub truncated: bool,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
