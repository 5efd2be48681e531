//! Kind-dispatching document reader

use crate::error::SourceError;
use crate::pdf::PdfReader;
use crate::spreadsheet::SpreadsheetReader;
use fiscal_domain::traits::DocumentReader;
use fiscal_domain::{DocumentKind, RawFragment, SourceDocument};

/// Reads any supported document into fragments
#[derive(Debug, Clone, Default)]
pub struct FileReader {
    pdf: PdfReader,
    spreadsheet: SpreadsheetReader,
}

impl FileReader {
    /// Create a reader with default settings for every format
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a customised PDF reader
    pub fn with_pdf_reader(mut self, pdf: PdfReader) -> Self {
        self.pdf = pdf;
        self
    }
}

impl DocumentReader for FileReader {
    type Error = SourceError;

    fn read(&self, document: &SourceDocument) -> Result<Vec<RawFragment>, Self::Error> {
        match document.kind {
            DocumentKind::Pdf => self.pdf.read(&document.path),
            DocumentKind::Spreadsheet => self.spreadsheet.read(&document.path),
        }
    }
}
