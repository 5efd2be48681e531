//! Relevance filtering of raw fragments
//!
//! A fragment is flattened to plain text (cells normalised and joined with
//! `" | "`, rows joined with newlines) and kept only when a keyword of the
//! active scope occurs in it. The table requirement and, for PDF pages,
//! exclusion markers are checked first and always win.

use crate::config::ExtractorConfig;
use fiscal_domain::{FilteredDocument, FilteredSection, FragmentSource, KeywordSet, RawFragment};
use std::path::PathBuf;
use tracing::debug;

/// Delimiter placed between cells of one row
pub const CELL_DELIMITER: &str = " | ";

/// Why a fragment was or was not retained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Retained
    Keep,
    /// The reader found no table on the fragment
    NoTable,
    /// An exclusion marker occurs in the page
    Excluded(String),
    /// No keyword of the active set occurs in the fragment
    NoKeyword,
}

/// Keyword filter for one domain scope
#[derive(Debug, Clone)]
pub struct TableFilter {
    keywords: KeywordSet,
    exclusions: Vec<String>,
    require_table: bool,
}

impl TableFilter {
    /// Keyword-only filter: no exclusions, non-tabular fragments allowed
    pub fn new(keywords: KeywordSet) -> Self {
        Self {
            keywords,
            exclusions: Vec::new(),
            require_table: false,
        }
    }

    /// Filter using the exclusion and table settings of `config`
    pub fn from_config(keywords: KeywordSet, config: &ExtractorConfig) -> Self {
        Self::new(keywords)
            .with_exclusions(&config.page_exclusions)
            .with_require_table(config.require_table)
    }

    /// Reject PDF pages containing any of these substrings
    ///
    /// Workbook sheets are never excluded: a functional-classification sheet
    /// is a regular source of expenditure figures.
    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclusions = exclusions
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Reject fragments the reader did not flag as tabular
    pub fn with_require_table(mut self, require_table: bool) -> Self {
        self.require_table = require_table;
        self
    }

    /// The active keyword set
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Decide on one fragment given its flattened text
    pub fn verdict(&self, fragment: &RawFragment, text: &str) -> Verdict {
        if self.require_table && !fragment.is_tabular() {
            return Verdict::NoTable;
        }
        if let FragmentSource::Page(_) = fragment.source() {
            if let Some(marker) = self.exclusions.iter().find(|e| text.contains(e.as_str())) {
                return Verdict::Excluded(marker.clone());
            }
        }
        if self.keywords.matches(text) {
            Verdict::Keep
        } else {
            Verdict::NoKeyword
        }
    }

    /// Keep the relevant fragments, in their original order
    ///
    /// An empty result means "no relevant data", never an error.
    pub fn filter(&self, fragments: &[RawFragment]) -> FilteredDocument {
        let document = fragments
            .first()
            .map(|f| f.document().to_path_buf())
            .unwrap_or_else(PathBuf::new);

        let mut sections = Vec::new();
        for fragment in fragments {
            let text = fragment_text(fragment);
            match self.verdict(fragment, &text) {
                Verdict::Keep => sections.push(FilteredSection {
                    source: fragment.source().clone(),
                    text,
                }),
                rejected => {
                    debug!(source = %fragment.source(), reason = ?rejected, "Fragment filtered out");
                }
            }
        }

        FilteredDocument::new(document, sections)
    }
}

/// Strip newlines, escaped-newline sequences and spaces from a cell
pub fn normalize_cell(cell: &str) -> String {
    cell.replace("\\n", "")
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | ' '))
        .collect()
}

/// Plain-text form of a fragment
pub fn fragment_text(fragment: &RawFragment) -> String {
    fragment
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| normalize_cell(cell))
                .collect::<Vec<_>>()
                .join(CELL_DELIMITER)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
