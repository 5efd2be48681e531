//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::RawFragment;
use std::path::{Path, PathBuf};

/// Trait for text-completion services
///
/// Implemented by the infrastructure layer (fiscal-llm)
pub trait CompletionProvider {
    /// Error type for completion calls
    type Error;

    /// Send a prompt and return the raw response text
    ///
    /// A single blocking call; implementations must not retry internally.
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Identifier of the model answering the calls
    fn model_name(&self) -> &str;
}

/// Kind of a source document, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// PDF report
    Pdf,
    /// Multi-sheet workbook
    Spreadsheet,
}

impl DocumentKind {
    /// Classify a path by extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(DocumentKind::Spreadsheet),
            _ => None,
        }
    }
}

/// A document found in a leaf directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Full path to the file
    pub path: PathBuf,
    /// Detected kind
    pub kind: DocumentKind,
}

/// Trait for turning a document into raw fragments
///
/// Implemented by the infrastructure layer (fiscal-sources)
pub trait DocumentReader {
    /// Error type for read operations
    type Error;

    /// Read every page or sheet of a document
    fn read(&self, document: &SourceDocument) -> Result<Vec<RawFragment>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("a/决算.PDF")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("b.xlsx")), Some(DocumentKind::Spreadsheet));
        assert_eq!(DocumentKind::from_path(Path::new("c.xls")), Some(DocumentKind::Spreadsheet));
        assert_eq!(DocumentKind::from_path(Path::new("d.docx")), None);
        assert_eq!(DocumentKind::from_path(Path::new("noext")), None);
    }
}
