//! Folding per-document results into one directory row

use crate::error::ExtractorError;
use crate::types::DocumentExtraction;
use fiscal_domain::{DirectoryRecord, IndicatorCatalog, OutputRow};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Per-directory counters reported to the operator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    /// Directory display name
    pub label: String,
    /// Documents offered to the aggregator
    pub documents: usize,
    /// Documents that contributed a record
    pub succeeded: usize,
    /// Documents that could not be read or had every scope fail
    pub failed: usize,
    /// Failed scope passes across all documents
    pub scope_failures: usize,
    /// Indicators with a value in the final row
    pub indicators_found: usize,
    /// Documents whose prompt text was truncated
    pub truncations: usize,
    /// Completion calls issued, retries included
    pub completion_calls: u32,
    /// Set when the directory could not be processed at all
    pub error: Option<String>,
}

impl DirectorySummary {
    /// Summary for a directory whose processing aborted
    pub fn aborted(label: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Accumulates document results for one leaf directory
///
/// Documents are folded one at a time, in the order they are offered.
#[derive(Debug)]
pub struct DirectoryAggregator {
    record: DirectoryRecord,
    summary: DirectorySummary,
}

impl DirectoryAggregator {
    /// Start an empty aggregation for `label`
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            record: DirectoryRecord::new(),
            summary: DirectorySummary {
                label: label.into(),
                ..DirectorySummary::default()
            },
        }
    }

    /// Fold one document's outcome into the directory
    ///
    /// Failures are counted and logged; they contribute nothing.
    pub fn fold(&mut self, document: &Path, outcome: Result<DocumentExtraction, ExtractorError>) {
        self.summary.documents += 1;

        match outcome {
            Ok(extraction) => {
                self.summary.scope_failures += extraction.failures.len();
                self.summary.completion_calls += extraction.metadata.completion_calls;
                if extraction.metadata.truncated {
                    self.summary.truncations += 1;
                }

                let attempted = extraction.metadata.scopes_attempted;
                if attempted > 0 && extraction.failures.len() >= attempted {
                    self.summary.failed += 1;
                    warn!(document = %document.display(), "Every scope failed, document contributes nothing");
                    return;
                }

                self.summary.succeeded += 1;
                self.record.merge_in_place(&extraction.record);
            }
            Err(e) => {
                self.summary.failed += 1;
                warn!(document = %document.display(), error = %e, "Document skipped");
            }
        }
    }

    /// The record assembled so far
    pub fn record(&self) -> &DirectoryRecord {
        &self.record
    }

    /// Project the record onto the catalog
    pub fn finish(self, catalog: &IndicatorCatalog) -> (OutputRow, DirectorySummary) {
        let row = self.record.finalize(catalog, &self.summary.label);
        let summary = DirectorySummary {
            indicators_found: row.filled(),
            ..self.summary
        };

        info!(
            directory = %summary.label,
            documents = summary.documents,
            failed = summary.failed,
            indicators = summary.indicators_found,
            "Directory finished"
        );

        (row, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractionMetadata, ScopeFailure};
    use fiscal_domain::{DomainScope, ExtractionRecord, Figure};
    use std::path::PathBuf;

    fn extraction(pairs: &[(&str, &str)]) -> DocumentExtraction {
        let mut record = ExtractionRecord::new();
        for (k, v) in pairs {
            record.offer(k, Figure::parse(v).unwrap());
        }
        DocumentExtraction {
            document: PathBuf::from("doc.pdf"),
            record,
            failures: Vec::new(),
            metadata: ExtractionMetadata {
                scopes_attempted: 1,
                completion_calls: 1,
                ..ExtractionMetadata::default()
            },
        }
    }

    #[test]
    fn test_two_documents_max_wins() {
        let catalog = IndicatorCatalog::reference();
        let mut agg = DirectoryAggregator::new("2019年");
        agg.fold(Path::new("a.pdf"), Ok(extraction(&[("税收收入", "100.00")])));
        agg.fold(Path::new("b.pdf"), Ok(extraction(&[("税收收入", "250.00"), ("印花税", "5.00")])));

        assert_eq!(agg.record().value("税收收入"), Some("250.00"));
        assert_eq!(agg.record().value("印花税"), Some("5.00"));

        let (row, summary) = agg.finish(&catalog);
        assert_eq!(row.width(), 1 + catalog.len());
        assert_eq!(summary.documents, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.indicators_found, 2);
        assert_eq!(summary.completion_calls, 2);
    }

    #[test]
    fn test_zero_readable_documents_yield_empty_row() {
        let catalog = IndicatorCatalog::reference();
        let mut agg = DirectoryAggregator::new("空目录");
        agg.fold(Path::new("bad.pdf"), Err(ExtractorError::Read("encrypted".into())));

        let (row, summary) = agg.finish(&catalog);
        assert_eq!(row.label(), "空目录");
        assert_eq!(row.width(), 1 + catalog.len());
        assert!(row.values().iter().all(String::is_empty));
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 0);
    }

    #[test]
    fn test_all_scopes_failed_counts_as_failed_document() {
        let mut failed = extraction(&[]);
        failed.failures.push(ScopeFailure {
            scope: DomainScope::General,
            reason: "Rate limit exceeded".into(),
            attempts: 3,
        });

        let mut agg = DirectoryAggregator::new("d");
        agg.fold(Path::new("a.pdf"), Ok(failed));
        agg.fold(Path::new("b.pdf"), Ok(extraction(&[("契税", "1")])));

        let (_, summary) = agg.finish(&IndicatorCatalog::reference());
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.scope_failures, 1);
    }

    #[test]
    fn test_aborted_summary() {
        let summary = DirectorySummary::aborted("d", "permission denied");
        assert_eq!(summary.error.as_deref(), Some("permission denied"));
        assert_eq!(summary.documents, 0);
    }
}
