//! PDF page reader
//!
//! `lopdf` yields plain page text without layout. Rows are recovered from
//! line breaks and cells from runs of whitespace, which is enough for the
//! column-aligned tables of budget reports.

use crate::error::SourceError;
use fiscal_domain::RawFragment;
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

/// Tabs, two or more spaces, or ideographic spaces separate cells
static CELL_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t+|[ \u{3000}]{2,}|\u{3000}").expect("cell pattern is valid"));

/// Default number of numeric multi-cell rows that make a page a table
pub const DEFAULT_MIN_TABLE_ROWS: usize = 3;

/// Reads PDF documents page by page
#[derive(Debug, Clone)]
pub struct PdfReader {
    min_table_rows: usize,
}

impl Default for PdfReader {
    fn default() -> Self {
        Self {
            min_table_rows: DEFAULT_MIN_TABLE_ROWS,
        }
    }
}

impl PdfReader {
    /// Create a reader with the default table heuristic
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows a page needs before it counts as a table
    pub fn with_min_table_rows(mut self, rows: usize) -> Self {
        self.min_table_rows = rows;
        self
    }

    /// One fragment per page, in page order
    ///
    /// Pages whose text cannot be extracted are skipped with a warning.
    ///
    /// # Errors
    ///
    /// `SourceError::Pdf` if the file is not a readable, unencrypted PDF.
    pub fn read(&self, path: &Path) -> Result<Vec<RawFragment>, SourceError> {
        let doc = Document::load(path).map_err(|e| SourceError::pdf(path, e))?;
        let pages = doc.get_pages();

        let mut fragments = Vec::new();
        for &page_num in pages.keys() {
            let text = match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), page = page_num, error = %e, "Page text unavailable, skipped");
                    continue;
                }
            };
            fragments.push(self.page_fragment(path, page_num, &text));
        }

        if fragments.is_empty() && !pages.is_empty() && doc.is_encrypted() {
            return Err(SourceError::pdf(path, "document is encrypted"));
        }

        debug!(path = %path.display(), pages = fragments.len(), "PDF read");
        Ok(fragments)
    }

    /// Turn one page of text into a fragment
    pub fn page_fragment(&self, path: &Path, page_num: u32, text: &str) -> RawFragment {
        let rows = split_rows(text);
        let tabular = looks_tabular(&rows, self.min_table_rows);
        RawFragment::page(path, page_num, rows, tabular)
    }
}

/// Split page text into rows of cells; blank lines are dropped
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            CELL_BREAK
                .split(line)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// At least `min_rows` rows with two or more cells and a digit
pub fn looks_tabular(rows: &[Vec<String>], min_rows: usize) -> bool {
    let numeric_rows = rows
        .iter()
        .filter(|row| row.len() >= 2 && row.iter().any(|c| c.chars().any(|ch| ch.is_ascii_digit())))
        .count();
    numeric_rows >= min_rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUDGET_PAGE: &str = "2019年一般公共预算收入决算表\n\n项目      预算数      决算数\n税收收入    1,200.00    1,234.50\n增值税\t500\t512.3\n契税  80  79.9\n";

    #[test]
    fn test_split_rows() {
        let rows = split_rows(BUDGET_PAGE);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], vec!["2019年一般公共预算收入决算表"]);
        assert_eq!(rows[1], vec!["项目", "预算数", "决算数"]);
        assert_eq!(rows[2], vec!["税收收入", "1,200.00", "1,234.50"]);
        assert_eq!(rows[3], vec!["增值税", "500", "512.3"]);
    }

    #[test]
    fn test_single_spaces_stay_in_cell() {
        let rows = split_rows("国有资源 (资产) 有偿使用收入   42");
        assert_eq!(rows[0], vec!["国有资源 (资产) 有偿使用收入", "42"]);
    }

    #[test]
    fn test_ideographic_space_splits() {
        let rows = split_rows("印花税\u{3000}15");
        assert_eq!(rows[0], vec!["印花税", "15"]);
    }

    #[test]
    fn test_table_heuristic() {
        assert!(looks_tabular(&split_rows(BUDGET_PAGE), DEFAULT_MIN_TABLE_ROWS));

        let prose = split_rows("2019年全市财政收入稳步增长。\n税收收入完成1234亿元。\n");
        assert!(!looks_tabular(&prose, DEFAULT_MIN_TABLE_ROWS));
    }

    #[test]
    fn test_page_fragment() {
        let reader = PdfReader::new().with_min_table_rows(1);
        let fragment = reader.page_fragment(Path::new("r.pdf"), 7, "契税  80");
        assert!(fragment.is_tabular());
        assert_eq!(fragment.source().to_string(), "第7页");
    }

    #[test]
    fn test_read_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let result = PdfReader::new().read(&path);
        assert!(matches!(result, Err(SourceError::Pdf { .. })));
    }
}
