//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::filter::TableFilter;
use crate::parser::parse_response;
use crate::prompt::{Prompt, PromptBuilder};
use crate::types::{DocumentExtraction, ExtractionMetadata, ScopeFailure};
use fiscal_domain::traits::CompletionProvider;
use fiscal_domain::{DomainScope, ExtractionRecord, FilteredDocument, IndicatorCatalog, KeywordSet, RawFragment};
use fiscal_llm::LlmError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor turns one document's fragments into an extraction record
///
/// Every document runs the filter → prompt → complete → parse pipeline once
/// per [`DomainScope`]; scopes with no relevant fragment cost no call.
pub struct Extractor<L>
where
    L: CompletionProvider,
{
    provider: Arc<L>,
    catalog: Arc<IndicatorCatalog>,
    filters: Vec<(DomainScope, TableFilter)>,
    prompts: PromptBuilder,
    config: ExtractorConfig,
}

/// Result of one scope pass
enum ScopeOutcome {
    Skipped,
    Extracted(ExtractionRecord),
    Failed(ScopeFailure),
}

impl<L> Extractor<L>
where
    L: CompletionProvider<Error = LlmError> + Send + Sync + 'static,
{
    /// Create a new Extractor using the reference keyword sets
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration is invalid.
    pub fn new(provider: L, catalog: IndicatorCatalog, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::from_shared(Arc::new(provider), Arc::new(catalog), config)
    }

    /// Create an Extractor over an already shared provider and catalog
    pub fn from_shared(
        provider: Arc<L>,
        catalog: Arc<IndicatorCatalog>,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let filters = DomainScope::ALL
            .iter()
            .map(|scope| (*scope, TableFilter::from_config(KeywordSet::reference(*scope), &config)))
            .collect();

        Ok(Self {
            prompts: PromptBuilder::new(&catalog, config.max_text_length),
            provider,
            catalog,
            filters,
            config,
        })
    }

    /// Replace the keyword set of one scope
    pub fn with_keywords(mut self, scope: DomainScope, keywords: KeywordSet) -> Self {
        let filter = TableFilter::from_config(keywords, &self.config);
        for (s, f) in self.filters.iter_mut() {
            if *s == scope {
                *f = filter.clone();
            }
        }
        self
    }

    /// The indicator catalog
    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Filter fragments for one scope
    pub fn filter(&self, scope: DomainScope, fragments: &[RawFragment]) -> FilteredDocument {
        self.filters
            .iter()
            .find(|(s, _)| *s == scope)
            .map(|(_, f)| f.filter(fragments))
            .unwrap_or_else(|| TableFilter::new(KeywordSet::reference(scope)).filter(fragments))
    }

    /// Build the prompt for one scope's filtered document
    pub fn prompt(&self, scope: DomainScope, filtered: &FilteredDocument) -> Prompt {
        self.prompts.build(&filtered.render(), scope)
    }

    /// Extract a record from one document's fragments
    ///
    /// Scope failures are reported in the result and never abort the other
    /// scope; scope records are combined with max-wins.
    pub async fn extract(&self, document: &Path, fragments: &[RawFragment]) -> DocumentExtraction {
        let start_time = Instant::now();
        let mut record = ExtractionRecord::new();
        let mut failures = Vec::new();
        let mut metadata = ExtractionMetadata {
            model_name: self.provider.model_name().to_string(),
            ..ExtractionMetadata::default()
        };

        for scope in DomainScope::ALL {
            match self.extract_scope(scope, document, fragments, &mut metadata).await {
                ScopeOutcome::Skipped => {}
                ScopeOutcome::Extracted(scope_record) => record.absorb(&scope_record),
                ScopeOutcome::Failed(failure) => failures.push(failure),
            }
        }

        metadata.processing_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            document = %document.display(),
            indicators = record.len(),
            failed_scopes = failures.len(),
            calls = metadata.completion_calls,
            "Document extracted"
        );

        DocumentExtraction {
            document: document.to_path_buf(),
            record,
            failures,
            metadata,
        }
    }

    async fn extract_scope(
        &self,
        scope: DomainScope,
        document: &Path,
        fragments: &[RawFragment],
        metadata: &mut ExtractionMetadata,
    ) -> ScopeOutcome {
        let filtered = self.filter(scope, fragments);
        if filtered.is_empty() {
            info!(document = %document.display(), scope = %scope, "No relevant fragments");
            return ScopeOutcome::Skipped;
        }
        metadata.scopes_attempted += 1;

        let prompt = self.prompt(scope, &filtered);
        if prompt.truncation().is_some() {
            metadata.truncated = true;
        }
        debug!(scope = %scope, sections = filtered.len(), prompt_chars = prompt.char_count(), "Prompt built");

        match self.complete_with_retry(scope, prompt.as_str(), metadata).await {
            Ok(response) => {
                debug!(scope = %scope, response_chars = response.chars().count(), "Completion received");
                ScopeOutcome::Extracted(parse_response(&response, &self.catalog))
            }
            Err(failure) => ScopeOutcome::Failed(failure),
        }
    }

    /// Call the provider with timeout, retrying transient failures
    async fn complete_with_retry(
        &self,
        scope: DomainScope,
        prompt: &str,
        metadata: &mut ExtractionMetadata,
    ) -> Result<String, ScopeFailure> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            metadata.completion_calls += 1;

            let mut call = self.spawn_call(prompt);
            let error = match timeout(self.config.extraction_timeout(), &mut call).await {
                Ok(joined) => match join_outcome(joined) {
                    Ok(response) => return Ok(response),
                    Err(e) => e,
                },
                Err(_) => {
                    // A blocking call cannot be cancelled; let it finish so
                    // at most one call is ever outstanding
                    warn!(scope = %scope, attempt, "Completion timed out, waiting for the outstanding call");
                    let late = join_outcome(call.await);
                    warn!(scope = %scope, attempt, late_success = late.is_ok(), "Timed-out call finished, result discarded");
                    ExtractorError::Timeout
                }
            };

            if !error.is_retryable() || attempt >= self.config.max_retries {
                warn!(scope = %scope, attempt, error = %error, "Completion failed, giving up on scope");
                return Err(ScopeFailure {
                    scope,
                    reason: error.to_string(),
                    attempts: attempt,
                });
            }

            let delay = self.config.retry_delay(attempt);
            warn!(
                scope = %scope,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Completion failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Start the completion call on the blocking pool
    fn spawn_call(&self, prompt: &str) -> JoinHandle<Result<String, LlmError>> {
        let provider = Arc::clone(&self.provider);
        let prompt = prompt.to_string();

        // CompletionProvider is not async
        tokio::task::spawn_blocking(move || provider.complete(&prompt))
    }
}

fn join_outcome(joined: Result<Result<String, LlmError>, JoinError>) -> Result<String, ExtractorError> {
    match joined {
        Ok(result) => result.map_err(ExtractorError::from),
        Err(e) => Err(ExtractorError::Llm(LlmError::Other(format!("Task join error: {}", e)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_llm::{MockFailure, MockProvider};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_config() -> ExtractorConfig {
        ExtractorConfig {
            retry_base_delay_ms: 1,
            ..ExtractorConfig::default()
        }
    }

    fn sheet(name: &str, cells: &[&str]) -> RawFragment {
        RawFragment::sheet("d.xlsx", name, vec![cells.iter().map(|c| c.to_string()).collect()])
    }

    #[tokio::test]
    async fn test_no_relevant_fragments_makes_no_call() {
        let llm = MockProvider::new("全市-税收收入: 1");
        let extractor = Extractor::new(llm.clone(), IndicatorCatalog::reference(), fast_config()).unwrap();

        let result = extractor.extract(Path::new("d.xlsx"), &[sheet("封面", &["目录"])]).await;
        assert!(result.record.is_empty());
        assert_eq!(result.metadata.scopes_attempted, 0);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_one_call_per_relevant_scope() {
        let llm = MockProvider::new("");
        llm.add_response_containing("重点关注一般公共预算", "全市-税收收入: 100");
        llm.add_response_containing("重点关注政府性基金", "全市-政府债务余额: 80");
        let extractor = Extractor::new(llm.clone(), IndicatorCatalog::reference(), fast_config()).unwrap();

        let fragments = [sheet("表一", &["税收收入", "100"]), sheet("表九", &["政府债务余额", "80"])];
        let result = extractor.extract(Path::new("d.xlsx"), &fragments).await;

        assert_eq!(llm.call_count(), 2);
        assert_eq!(result.metadata.scopes_attempted, 2);
        assert_eq!(result.record.value("税收收入"), Some("100.00"));
        assert_eq!(result.record.value("政府债务余额"), Some("80.00"));
        assert!(!result.has_failures());
    }

    #[tokio::test]
    async fn test_retry_on_throttling() {
        let llm = MockProvider::new("全市-契税: 9");
        llm.queue_failure(MockFailure::RateLimited);
        llm.queue_failure(MockFailure::Communication);
        let extractor = Extractor::new(llm.clone(), IndicatorCatalog::reference(), fast_config()).unwrap();

        let result = extractor.extract(Path::new("d.xlsx"), &[sheet("s", &["契税", "9"])]).await;
        assert_eq!(result.record.value("契税"), Some("9.00"));
        assert_eq!(result.metadata.completion_calls, 3);
        assert!(!result.has_failures());
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_scope_immediately() {
        let llm = MockProvider::new("全市-契税: 9");
        llm.queue_failure(MockFailure::InvalidResponse);
        let extractor = Extractor::new(llm.clone(), IndicatorCatalog::reference(), fast_config()).unwrap();

        let result = extractor.extract(Path::new("d.xlsx"), &[sheet("s", &["契税", "9"])]).await;
        assert!(result.record.is_empty());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].scope, DomainScope::General);
        assert_eq!(result.failures[0].attempts, 1);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let llm = MockProvider::new("全市-契税: 9");
        for _ in 0..5 {
            llm.queue_failure(MockFailure::Timeout);
        }
        let config = ExtractorConfig { max_retries: 2, ..fast_config() };
        let extractor = Extractor::new(llm.clone(), IndicatorCatalog::reference(), config).unwrap();

        let result = extractor.extract(Path::new("d.xlsx"), &[sheet("s", &["契税", "9"])]).await;
        assert_eq!(llm.call_count(), 2);
        assert_eq!(result.failures[0].attempts, 2);
        assert!(result.record.is_empty());
    }

    /// Sleeps through every call and records how many overlap
    struct SlowProvider {
        delay: std::time::Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl CompletionProvider for SlowProvider {
        type Error = LlmError;

        fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("全市-契税: 9".to_string())
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_timed_out_call_is_drained_before_retry() {
        let llm = Arc::new(SlowProvider {
            delay: std::time::Duration::from_millis(1_500),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let config = ExtractorConfig {
            extraction_timeout_secs: 1,
            max_retries: 2,
            ..fast_config()
        };
        let extractor =
            Extractor::from_shared(Arc::clone(&llm), Arc::new(IndicatorCatalog::reference()), config).unwrap();

        let result = extractor.extract(Path::new("d.xlsx"), &[sheet("s", &["契税", "9"])]).await;

        assert!(result.record.is_empty());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].reason, ExtractorError::Timeout.to_string());
        assert_eq!(result.failures[0].attempts, 2);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
        assert_eq!(llm.peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig { max_text_length: 0, ..ExtractorConfig::default() };
        let result = Extractor::new(MockProvider::default(), IndicatorCatalog::reference(), config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_custom_keywords() {
        let extractor = Extractor::new(MockProvider::default(), IndicatorCatalog::reference(), fast_config())
            .unwrap()
            .with_keywords(DomainScope::General, KeywordSet::new(["自定义"]));

        let fragments = [sheet("a", &["自定义表"]), sheet("b", &["税收收入"])];
        let filtered = extractor.filter(DomainScope::General, &fragments);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.render().contains("自定义表"));
    }
}
