//! Raw fragments read from documents and their filtered concatenation

use std::fmt;
use std::path::{Path, PathBuf};

/// Line placed after every retained fragment to mark a table boundary
pub const SECTION_SEPARATOR: &str = "--------------------------------------";

/// Where inside a document a fragment came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FragmentSource {
    /// 1-based PDF page number
    Page(u32),
    /// Spreadsheet sheet name
    Sheet(String),
}

impl fmt::Display for FragmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentSource::Page(number) => write!(f, "第{}页", number),
            FragmentSource::Sheet(name) => f.write_str(name),
        }
    }
}

/// One page's or one sheet's worth of content
///
/// Immutable once produced by a document reader.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    document: PathBuf,
    source: FragmentSource,
    rows: Vec<Vec<String>>,
    tabular: bool,
}

impl RawFragment {
    /// Create a fragment from a spreadsheet sheet (always tabular)
    pub fn sheet(document: impl Into<PathBuf>, name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            document: document.into(),
            source: FragmentSource::Sheet(name.into()),
            rows,
            tabular: true,
        }
    }

    /// Create a fragment from a PDF page
    ///
    /// `tabular` records whether the reader detected a table on the page.
    pub fn page(document: impl Into<PathBuf>, number: u32, rows: Vec<Vec<String>>, tabular: bool) -> Self {
        Self {
            document: document.into(),
            source: FragmentSource::Page(number),
            rows,
            tabular,
        }
    }

    /// Path of the source document
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Page or sheet identifier
    pub fn source(&self) -> &FragmentSource {
        &self.source
    }

    /// Cell grid, one inner vector per row
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Whether the fragment holds a table
    pub fn is_tabular(&self) -> bool {
        self.tabular
    }
}

/// A fragment that passed relevance filtering, rendered to plain text
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSection {
    /// Page or sheet identifier
    pub source: FragmentSource,
    /// Normalized plain-text rendering of the fragment
    pub text: String,
}

/// Ordered relevant fragments of one document
///
/// An empty document means "no relevant data", never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredDocument {
    document: PathBuf,
    sections: Vec<FilteredSection>,
}

impl FilteredDocument {
    /// Create a filtered document from retained sections, in original order
    pub fn new(document: impl Into<PathBuf>, sections: Vec<FilteredSection>) -> Self {
        Self {
            document: document.into(),
            sections,
        }
    }

    /// Path of the source document
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Retained sections
    pub fn sections(&self) -> &[FilteredSection] {
        &self.sections
    }

    /// True when nothing was retained
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of retained sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Concatenate sections with marker and separator lines
    ///
    /// ```text
    /// === <source> ===
    /// <text>
    /// --------------------------------------
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("=== {} ===\n", section.source));
            out.push_str(&section.text);
            out.push('\n');
            out.push_str(SECTION_SEPARATOR);
            out.push('\n');
        }
        out
    }
}
