//! Extraction records and their reconciliation
//!
//! Both granularities (duplicate mentions within one response, and records
//! of several documents in one directory) use the same max-wins rule: a
//! candidate replaces the stored figure only if it is strictly greater.

use crate::figure::Figure;
use crate::indicator::IndicatorCatalog;
use std::collections::BTreeMap;

/// Indicator → figure for one document (or one logical document group)
///
/// Only indicators actually found are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionRecord {
    figures: BTreeMap<String, Figure>,
}

impl ExtractionRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate figure for an indicator
    ///
    /// Returns `true` when the record changed (new indicator, or a strictly
    /// greater value).
    pub fn offer(&mut self, indicator: &str, candidate: Figure) -> bool {
        match self.figures.get_mut(indicator) {
            Some(existing) => {
                if existing.is_superseded_by(&candidate) {
                    *existing = candidate;
                    true
                } else {
                    false
                }
            }
            None => {
                self.figures.insert(indicator.to_string(), candidate);
                true
            }
        }
    }

    /// Offer every figure of `other`, indicator by indicator
    pub fn absorb(&mut self, other: &ExtractionRecord) {
        for (indicator, figure) in &other.figures {
            self.offer(indicator, figure.clone());
        }
    }

    /// Stored figure for an indicator
    pub fn get(&self, indicator: &str) -> Option<&Figure> {
        self.figures.get(indicator)
    }

    /// Stored value for an indicator as rendered text
    pub fn value(&self, indicator: &str) -> Option<&str> {
        self.figures.get(indicator).map(Figure::as_str)
    }

    /// Iterate indicator/figure pairs (sorted by indicator name)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Figure)> {
        self.figures.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Indicator names present in the record
    pub fn indicators(&self) -> impl Iterator<Item = &str> {
        self.figures.keys().map(String::as_str)
    }

    /// Number of indicators found
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// True when no indicator was found
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

/// Reconciled record for one leaf directory
///
/// Assembled fully in memory; only [`DirectoryRecord::finalize`] projects it
/// to an output row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryRecord {
    record: ExtractionRecord,
}

impl DirectoryRecord {
    /// Create an empty directory record
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's record into this directory (max-wins per indicator)
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscal_domain::{DirectoryRecord, ExtractionRecord, Figure};
    ///
    /// let mut a = ExtractionRecord::new();
    /// a.offer("税收收入", Figure::parse("100").unwrap());
    /// let mut b = ExtractionRecord::new();
    /// b.offer("税收收入", Figure::parse("250").unwrap());
    ///
    /// let merged = DirectoryRecord::new().merge(&a).merge(&b);
    /// assert_eq!(merged.value("税收收入"), Some("250.00"));
    /// ```
    pub fn merge(mut self, incoming: &ExtractionRecord) -> Self {
        self.merge_in_place(incoming);
        self
    }

    /// In-place variant of [`DirectoryRecord::merge`]
    pub fn merge_in_place(&mut self, incoming: &ExtractionRecord) {
        self.record.absorb(incoming);
    }

    /// Stored value for an indicator
    pub fn value(&self, indicator: &str) -> Option<&str> {
        self.record.value(indicator)
    }

    /// The underlying record
    pub fn record(&self) -> &ExtractionRecord {
        &self.record
    }

    /// Number of indicators with a value
    pub fn len(&self) -> usize {
        self.record.len()
    }

    /// True when no indicator has a value
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Project onto the full catalog, in catalog order
    ///
    /// Indicators without a value become empty strings, so the row always has
    /// `1 + catalog.len()` fields.
    pub fn finalize(&self, catalog: &IndicatorCatalog, directory_label: &str) -> OutputRow {
        let values = catalog
            .iter()
            .map(|name| self.record.value(name).unwrap_or_default().to_string())
            .collect();
        OutputRow {
            label: directory_label.to_string(),
            values,
        }
    }
}

/// One output line: directory label followed by catalog-ordered values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    label: String,
    values: Vec<String>,
}

impl OutputRow {
    /// A row with every indicator empty
    pub fn empty(catalog: &IndicatorCatalog, directory_label: &str) -> Self {
        DirectoryRecord::new().finalize(catalog, directory_label)
    }

    /// Directory display name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Indicator values in catalog order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of non-empty indicator values
    pub fn filled(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }

    /// All fields: label first, then values
    pub fn fields(&self) -> Vec<&str> {
        std::iter::once(self.label.as_str())
            .chain(self.values.iter().map(String::as_str))
            .collect()
    }

    /// Number of fields (`1 + catalog length`)
    pub fn width(&self) -> usize {
        1 + self.values.len()
    }
}
