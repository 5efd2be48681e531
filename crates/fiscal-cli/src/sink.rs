//! CSV output artifact

use crate::error::{CliError, Result};
use encoding_rs::Encoding;
use fiscal_domain::{IndicatorCatalog, OutputRow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name prefix of the default output artifact
pub const OUTPUT_PREFIX: &str = "财政数据汇总";

/// Writes the header and every row in one pass, then transcodes
#[derive(Debug, Clone)]
pub struct CsvSink {
    encoding: &'static Encoding,
    label_header: String,
}

impl CsvSink {
    /// Create a sink for an `encoding_rs` label such as `gbk` or `utf-8`
    pub fn new(encoding: &str, label_header: impl Into<String>) -> Result<Self> {
        let encoding =
            Encoding::for_label(encoding.trim().as_bytes()).ok_or_else(|| CliError::Encoding(encoding.to_string()))?;
        Ok(Self {
            encoding,
            label_header: label_header.into(),
        })
    }

    /// Encoding of the written bytes
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Render the artifact as encoded bytes
    ///
    /// Characters the encoding cannot represent are written as numeric
    /// character references and reported with a warning.
    pub fn render(&self, catalog: &IndicatorCatalog, rows: &[OutputRow]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(std::iter::once(self.label_header.as_str()).chain(catalog.iter()))?;
        for row in rows {
            writer.write_record(row.fields())?;
        }

        let buffer = writer.into_inner().map_err(|e| CliError::Io(e.into_error()))?;
        let text = String::from_utf8(buffer).map_err(|e| CliError::InvalidInput(e.to_string()))?;

        let (bytes, used, had_errors) = self.encoding.encode(&text);
        if had_errors {
            warn!(encoding = used.name(), "Some characters could not be represented and were escaped");
        }
        Ok(bytes.into_owned())
    }

    /// Render and write the artifact to `path`
    pub fn write(&self, path: &Path, catalog: &IndicatorCatalog, rows: &[OutputRow]) -> Result<()> {
        let bytes = self.render(catalog, rows)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;

        info!(path = %path.display(), rows = rows.len(), encoding = self.encoding.name(), "Output written");
        Ok(())
    }
}

/// `<parent of root>/财政数据汇总<root name>.csv`
pub fn default_output_path(root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = format!("{}{}.csv", OUTPUT_PREFIX, name);
    match root.parent() {
        Some(parent) => parent.join(file),
        None => PathBuf::from(file),
    }
}
