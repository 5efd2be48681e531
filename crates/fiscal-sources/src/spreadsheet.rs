//! Workbook reader

use crate::error::SourceError;
use calamine::{open_workbook_auto, Data, Reader};
use fiscal_domain::RawFragment;
use std::path::Path;
use tracing::{debug, warn};

/// Reads every sheet of a workbook as a full cell grid
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetReader;

impl SpreadsheetReader {
    /// Create a reader
    pub fn new() -> Self {
        Self
    }

    /// One fragment per sheet, in workbook order
    ///
    /// Sheets that fail to load are skipped with a warning.
    ///
    /// # Errors
    ///
    /// `SourceError::Spreadsheet` if the workbook cannot be opened.
    pub fn read(&self, path: &Path) -> Result<Vec<RawFragment>, SourceError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| SourceError::spreadsheet(path, e))?;

        let mut fragments = Vec::new();
        for name in workbook.sheet_names().to_owned() {
            match workbook.worksheet_range(&name) {
                Ok(range) => {
                    let rows = range
                        .rows()
                        .map(|row| row.iter().map(cell_text).collect())
                        .collect();
                    fragments.push(RawFragment::sheet(path, name, rows));
                }
                Err(e) => {
                    warn!(path = %path.display(), sheet = %name, error = %e, "Sheet could not be loaded, skipped");
                }
            }
        }

        debug!(path = %path.display(), sheets = fragments.len(), "Workbook read");
        Ok(fragments)
    }
}

/// Render one cell; empty cells become `""`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
