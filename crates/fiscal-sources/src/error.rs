//! Error types for document sources

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning directories or reading documents
#[derive(Error, Debug)]
pub enum SourceError {
    /// Filesystem failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The PDF could not be opened or decoded
    #[error("PDF error in {}: {message}", path.display())]
    Pdf {
        /// Offending document
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The workbook could not be opened
    #[error("Spreadsheet error in {}: {message}", path.display())]
    Spreadsheet {
        /// Offending document
        path: PathBuf,
        /// Reader message
        message: String,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn pdf(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SourceError::Pdf {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn spreadsheet(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SourceError::Spreadsheet {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
