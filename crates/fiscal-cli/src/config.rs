//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use encoding_rs::Encoding;
use fiscal_domain::{DomainScope, IndicatorCatalog, KeywordSet};
use fiscal_extractor::ExtractorConfig;
use fiscal_llm::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the provider API key
pub const API_KEY_ENV: &str = "FISCAL_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion provider settings
    pub llm: ProviderConfig,

    /// Pipeline settings
    pub extractor: ExtractorConfig,

    /// CSV artifact settings
    pub output: OutputSettings,

    /// Batch scheduling
    pub batch: BatchSettings,

    /// Catalog and vocabulary overrides
    pub catalog: CatalogSettings,
}

/// Output artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Encoding label understood by `encoding_rs` (e.g. `gbk`, `utf-8`)
    pub encoding: String,

    /// Header of the first column
    pub label_header: String,
}

/// Batch scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Directories processed at the same time
    pub concurrency: usize,
}

/// Optional replacements for the built-in catalog and keyword sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Indicator names, in output column order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<String>>,

    /// Vocabulary of the general-budget pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_keywords: Option<Vec<String>>,

    /// Vocabulary of the fund and debt pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_keywords: Option<Vec<String>>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            encoding: "gbk".to_string(),
            label_header: "directory".to_string(),
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".fiscal").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate().map_err(CliError::Config)?;
        self.extractor.validate().map_err(CliError::Config)?;
        self.output_encoding()?;

        if self.extractor.extraction_timeout_secs < self.llm.request_timeout_secs {
            return Err(CliError::Config(format!(
                "extractor.extraction_timeout_secs ({}) must not be shorter than llm.request_timeout_secs ({})",
                self.extractor.extraction_timeout_secs, self.llm.request_timeout_secs
            )));
        }

        if self.output.label_header.trim().is_empty() {
            return Err(CliError::Config("output.label_header must not be empty".into()));
        }
        if self.batch.concurrency == 0 {
            return Err(CliError::Config("batch.concurrency must be at least 1".into()));
        }
        if self.catalog.indicators.is_some() && self.catalog().is_empty() {
            return Err(CliError::Config("catalog.indicators must name at least one indicator".into()));
        }
        for scope in DomainScope::ALL {
            if self.keywords(scope).is_some_and(|k| k.is_empty()) {
                return Err(CliError::Config(format!("{} keyword list must not be empty", scope.label())));
            }
        }
        Ok(())
    }

    /// The configured output encoding.
    pub fn output_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.output.encoding.trim().as_bytes())
            .ok_or_else(|| CliError::Encoding(self.output.encoding.clone()))
    }

    /// The indicator catalog: the override when given, the reference list otherwise.
    pub fn catalog(&self) -> IndicatorCatalog {
        match &self.catalog.indicators {
            Some(names) => IndicatorCatalog::new(names),
            None => IndicatorCatalog::reference(),
        }
    }

    /// Keyword override for one scope, if configured.
    pub fn keywords(&self, scope: DomainScope) -> Option<KeywordSet> {
        let words = match scope {
            DomainScope::General => self.catalog.general_keywords.as_ref(),
            DomainScope::Fund => self.catalog.fund_keywords.as_ref(),
        };
        words.map(KeywordSet::new)
    }
}
