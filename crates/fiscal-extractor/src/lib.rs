//! Fiscal Extract Pipeline
//!
//! Turns the pages and sheets of government financial reports into
//! normalized fiscal figures using a text-completion service.
//!
//! # Architecture
//!
//! ```text
//! RawFragments → TableFilter → PromptBuilder → CompletionProvider → parse_response
//!                                                                        ↓
//!                                     OutputRow ← DirectoryAggregator ← ExtractionRecord
//! ```
//!
//! # Key Features
//!
//! - **Scoped filtering**: general-budget and fund/debt vocabularies run as
//!   separate passes with their own emphasis
//! - **Bounded prompts**: table text is cut at a character limit
//! - **Lenient parsing**: malformed lines are dropped one at a time
//! - **Max-wins reconciliation**: within a response, across scopes and
//!   across documents
//! - **Retry with backoff**: only around the completion call
//!
//! # Example Usage
//!
//! ```no_run
//! use fiscal_domain::{IndicatorCatalog, RawFragment};
//! use fiscal_extractor::{DirectoryAggregator, Extractor, ExtractorConfig};
//! use fiscal_llm::MockProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("全市-税收收入: 1,024.5");
//! let catalog = IndicatorCatalog::reference();
//! let extractor = Extractor::new(llm, catalog.clone(), ExtractorConfig::default())?;
//!
//! let document = Path::new("2019/决算.xlsx");
//! let fragments = vec![RawFragment::sheet(document, "表一", vec![vec!["税收收入".into(), "1024.5".into()]])];
//!
//! let mut aggregator = DirectoryAggregator::new("2019");
//! aggregator.fold(document, Ok(extractor.extract(document, &fragments).await));
//!
//! let (row, summary) = aggregator.finish(&catalog);
//! println!("{}: {} indicators", row.label(), summary.indicators_found);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod aggregator;
mod config;
mod error;
mod extractor;
mod filter;
mod parser;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use aggregator::{DirectoryAggregator, DirectorySummary};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use filter::{fragment_text, normalize_cell, TableFilter, Verdict, CELL_DELIMITER};
pub use parser::{parse_line, parse_response, LineOutcome};
pub use prompt::{truncate_chars, Prompt, PromptBuilder, Truncation};
pub use types::{DocumentExtraction, ExtractionMetadata, ScopeFailure};
