//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::{Color, Colorize};
use fiscal_domain::DocumentKind;
use fiscal_extractor::DirectorySummary;
use fiscal_sources::LeafDirectory;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self { format, color_enabled }
    }

    /// Format the per-directory results of a batch.
    pub fn format_summaries(&self, summaries: &[DirectorySummary]) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(summaries)?),
            CliFormat::Table => Ok(self.summaries_table(summaries)),
        }
    }

    fn summaries_table(&self, summaries: &[DirectorySummary]) -> String {
        if summaries.is_empty() {
            return self.warning("No leaf directories found.");
        }

        let mut builder = Builder::default();
        builder.push_record(["Directory", "Documents", "Failed", "Scope failures", "Indicators", "Truncated", "Calls", "Status"]);

        for s in summaries {
            let status = match &s.error {
                Some(error) => error.as_str(),
                None if s.failed > 0 => "partial",
                None => "ok",
            };
            builder.push_record([
                s.label.clone(),
                s.documents.to_string(),
                s.failed.to_string(),
                s.scope_failures.to_string(),
                s.indicators_found.to_string(),
                s.truncations.to_string(),
                s.completion_calls.to_string(),
                status.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", table, self.totals(summaries))
    }

    /// One-line totals for a batch.
    pub fn totals(&self, summaries: &[DirectorySummary]) -> String {
        let documents: usize = summaries.iter().map(|s| s.documents).sum();
        let failed: usize = summaries.iter().map(|s| s.failed).sum();
        let aborted = summaries.iter().filter(|s| s.error.is_some()).count();
        let values: usize = summaries.iter().map(|s| s.indicators_found).sum();

        let line = format!(
            "{} directories, {} documents ({} failed), {} indicator values",
            summaries.len(),
            documents,
            failed,
            values
        );
        if failed > 0 || aborted > 0 {
            self.warning(&line)
        } else {
            self.success(&line)
        }
    }

    /// Format the result of a scan.
    pub fn format_leaves(&self, leaves: &[LeafDirectory]) -> Result<String> {
        match self.format {
            CliFormat::Json => {
                let json: Vec<serde_json::Value> = leaves
                    .iter()
                    .map(|leaf| {
                        serde_json::json!({
                            "name": leaf.name,
                            "path": leaf.path.display().to_string(),
                            "documents": leaf
                                .documents
                                .iter()
                                .map(|d| d.path.display().to_string())
                                .collect::<Vec<_>>(),
                            "error": leaf.listing_error,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            CliFormat::Table => Ok(self.leaves_table(leaves)),
        }
    }

    fn leaves_table(&self, leaves: &[LeafDirectory]) -> String {
        if leaves.is_empty() {
            return self.warning("No leaf directories found.");
        }

        let mut builder = Builder::default();
        builder.push_record(["Directory", "Path", "PDF", "Spreadsheets", "Note"]);

        for leaf in leaves {
            let note = match (&leaf.listing_error, leaf.documents.is_empty()) {
                (Some(error), _) => error.clone(),
                (None, true) => "no documents".to_string(),
                (None, false) => String::new(),
            };
            builder.push_record([
                leaf.name.clone(),
                leaf.path.display().to_string(),
                leaf.count(DocumentKind::Pdf).to_string(),
                leaf.count(DocumentKind::Spreadsheet).to_string(),
                note,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a section heading.
    pub fn heading(&self, text: &str) -> String {
        if self.color_enabled {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Color::Red)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Color::Yellow)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}
