//! Fiscal Extract Document Sources
//!
//! Everything that touches the input tree: finding leaf directories,
//! classifying the documents inside them and reading PDFs and workbooks into
//! [`RawFragment`](fiscal_domain::RawFragment)s.
//!
//! # Example
//!
//! ```no_run
//! use fiscal_domain::traits::DocumentReader;
//! use fiscal_sources::{DirectoryScanner, FileReader};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), fiscal_sources::SourceError> {
//! let reader = FileReader::new();
//! for leaf in DirectoryScanner::new().scan(Path::new("data/北京"))? {
//!     for document in &leaf.documents {
//!         let fragments = reader.read(document)?;
//!         println!("{} / {}: {} fragments", leaf.name, document.path.display(), fragments.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod pdf;
mod reader;
mod scanner;
mod spreadsheet;

pub use error::SourceError;
pub use pdf::{looks_tabular, split_rows, PdfReader, DEFAULT_MIN_TABLE_ROWS};
pub use reader::FileReader;
pub use scanner::{DirectoryScanner, LeafDirectory};
pub use spreadsheet::SpreadsheetReader;
