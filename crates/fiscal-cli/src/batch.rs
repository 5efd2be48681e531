//! Batch processing over leaf directories
//!
//! Directories are independent: each one is read, extracted and folded on
//! its own, and up to `concurrency` of them are in flight at once. Rows come
//! back in scan order whatever the completion order.

use crate::config::Config;
use crate::error::Result;
use fiscal_domain::traits::{CompletionProvider, DocumentReader};
use fiscal_domain::{DomainScope, OutputRow, RawFragment, SourceDocument};
use fiscal_extractor::{DirectoryAggregator, DirectorySummary, Extractor, ExtractorError};
use fiscal_llm::LlmError;
use fiscal_sources::LeafDirectory;
use futures::stream::{self, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Rows and summaries of a finished batch, in scan order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One row per leaf directory
    pub rows: Vec<OutputRow>,
    /// One summary per leaf directory
    pub summaries: Vec<DirectorySummary>,
}

/// Runs the pipeline over a list of leaf directories
pub struct BatchRunner<L, R>
where
    L: CompletionProvider,
{
    extractor: Extractor<L>,
    reader: Arc<R>,
    concurrency: usize,
}

/// Build an extractor from the configuration, applying keyword overrides
pub fn build_extractor<L>(provider: L, config: &Config) -> Result<Extractor<L>>
where
    L: CompletionProvider<Error = LlmError> + Send + Sync + 'static,
{
    let mut extractor = Extractor::new(provider, config.catalog(), config.extractor.clone())?;
    for scope in DomainScope::ALL {
        if let Some(keywords) = config.keywords(scope) {
            extractor = extractor.with_keywords(scope, keywords);
        }
    }
    Ok(extractor)
}

impl<L, R> BatchRunner<L, R>
where
    L: CompletionProvider<Error = LlmError> + Send + Sync + 'static,
    R: DocumentReader + Send + Sync + 'static,
    R::Error: Display,
{
    /// Create a sequential runner
    pub fn new(extractor: Extractor<L>, reader: R) -> Self {
        Self {
            extractor,
            reader: Arc::new(reader),
            concurrency: 1,
        }
    }

    /// Process up to `concurrency` directories at once (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The extractor used for every document
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }

    /// Process every leaf; never fails as a whole
    pub async fn run(&self, leaves: &[LeafDirectory]) -> BatchReport {
        let start = Instant::now();
        info!(directories = leaves.len(), concurrency = self.concurrency, "Batch started");

        let results: Vec<(OutputRow, DirectorySummary)> = stream::iter(leaves)
            .map(|leaf| self.process_directory(leaf))
            .buffered(self.concurrency)
            .collect()
            .await;
        let (rows, summaries): (Vec<_>, Vec<_>) = results.into_iter().unzip();

        info!(
            directories = summaries.len(),
            documents = summaries.iter().map(|s| s.documents).sum::<usize>(),
            failed_documents = summaries.iter().map(|s| s.failed).sum::<usize>(),
            aborted = summaries.iter().filter(|s| s.error.is_some()).count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );

        BatchReport { rows, summaries }
    }

    /// Process one leaf directory into its row
    ///
    /// Documents are read and extracted one after another and folded in
    /// order. A directory that could not be listed yields an empty row.
    pub async fn process_directory(&self, leaf: &LeafDirectory) -> (OutputRow, DirectorySummary) {
        let catalog = self.extractor.catalog();

        if let Some(error) = &leaf.listing_error {
            warn!(directory = %leaf.name, error = %error, "Directory could not be listed, row left empty");
            return (OutputRow::empty(catalog, &leaf.name), DirectorySummary::aborted(&leaf.name, error));
        }

        info!(directory = %leaf.name, documents = leaf.documents.len(), "Directory started");

        let mut aggregator = DirectoryAggregator::new(&leaf.name);
        for document in &leaf.documents {
            let outcome = match self.read(document).await {
                Ok(fragments) => Ok(self.extractor.extract(&document.path, &fragments).await),
                Err(e) => Err(e),
            };
            aggregator.fold(&document.path, outcome);
        }

        aggregator.finish(catalog)
    }

    /// Read one document off the async workers
    async fn read(&self, document: &SourceDocument) -> std::result::Result<Vec<RawFragment>, ExtractorError> {
        let reader = Arc::clone(&self.reader);
        let document = document.clone();

        tokio::task::spawn_blocking(move || reader.read(&document).map_err(|e| ExtractorError::Read(e.to_string())))
            .await
            .map_err(|e| ExtractorError::Read(format!("Reader task failed: {}", e)))?
    }
}
