//! Parse free-text completion responses into extraction records
//!
//! The response is scanned line by line for `<region>-<indicator>: <value>`.
//! Parsing is lenient: prose lines, unknown indicators and malformed numbers
//! are skipped one line at a time, never failing the whole response.

use fiscal_domain::{ExtractionRecord, Figure, IndicatorCatalog, ValueFormatError};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Optional region tag, indicator label, colon (ASCII or full-width), numeric literal
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:市级|全市)?-?(.+?)[:：]\s*([\d\-.,]+)").expect("line pattern is valid")
});

/// What became of a single response line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// A catalog indicator with a valid figure
    Accepted {
        /// Trimmed indicator label
        indicator: String,
        /// Parsed figure
        figure: Figure,
    },
    /// The line does not look like a data line
    NoMatch,
    /// The label is not in the catalog
    UnknownIndicator(String),
    /// The numeric literal could not be parsed
    BadValue(ValueFormatError),
}

/// Classify one response line
pub fn parse_line(line: &str, catalog: &IndicatorCatalog) -> LineOutcome {
    let Some(captures) = LINE_PATTERN.captures(line) else {
        return LineOutcome::NoMatch;
    };

    let indicator = captures[1].trim();
    if !catalog.contains(indicator) {
        return LineOutcome::UnknownIndicator(indicator.to_string());
    }

    match Figure::parse(&captures[2]) {
        Ok(figure) => LineOutcome::Accepted {
            indicator: indicator.to_string(),
            figure,
        },
        Err(e) => LineOutcome::BadValue(e),
    }
}

/// Parse a completion response into an extraction record
///
/// Duplicate mentions of an indicator are reconciled with max-wins. A
/// response without any data line yields an empty record.
///
/// # Examples
///
/// ```
/// use fiscal_domain::IndicatorCatalog;
/// use fiscal_extractor::parse_response;
///
/// let catalog = IndicatorCatalog::reference();
/// let record = parse_response("全市-增值税: 1,234.50\n全市-增值税: 999.00", &catalog);
/// assert_eq!(record.value("增值税"), Some("1234.50"));
/// ```
pub fn parse_response(response: &str, catalog: &IndicatorCatalog) -> ExtractionRecord {
    let mut record = ExtractionRecord::new();

    for line in response.lines() {
        match parse_line(line, catalog) {
            LineOutcome::Accepted { indicator, figure } => {
                if !record.offer(&indicator, figure) {
                    debug!(indicator = %indicator, "Smaller duplicate value ignored");
                }
            }
            LineOutcome::NoMatch => {}
            LineOutcome::UnknownIndicator(label) => {
                debug!(label = %label, "Indicator not in catalog, line dropped");
            }
            LineOutcome::BadValue(e) => {
                warn!(line = %line, error = %e, "Failed to parse value, line dropped");
            }
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> IndicatorCatalog {
        IndicatorCatalog::reference()
    }

    #[test]
    fn test_duplicate_keeps_larger_first_value() {
        let record = parse_response("全市-增值税: 1,234.50\n全市-增值税: 999.00", &catalog());
        assert_eq!(record.len(), 1);
        assert_eq!(record.value("增值税"), Some("1234.50"));
    }

    #[test]
    fn test_duplicate_later_larger_value_wins() {
        let record = parse_response("市级-契税: 10\n全市-契税: 12.346", &catalog());
        assert_eq!(record.value("契税"), Some("12.35"));
    }

    #[test]
    fn test_no_matching_lines() {
        let record = parse_response("以下是提取结果。\n\n未找到相关数据", &catalog());
        assert!(record.is_empty());
    }

    #[test]
    fn test_unknown_indicator_dropped() {
        let record = parse_response("市级-未知指标: 10.00", &catalog());
        assert!(record.is_empty());
        assert_eq!(
            parse_line("市级-未知指标: 10.00", &catalog()),
            LineOutcome::UnknownIndicator("未知指标".into())
        );
    }

    #[test]
    fn test_bad_value_drops_only_that_line() {
        let response = "全市-增值税: abc\n全市-契税: 1-2\n全市-税收收入: 500";
        let record = parse_response(response, &catalog());
        assert_eq!(record.len(), 1);
        assert_eq!(record.value("税收收入"), Some("500.00"));
        assert!(record.get("增值税").is_none());
        assert!(matches!(parse_line("全市-契税: 1-2", &catalog()), LineOutcome::BadValue(_)));
    }

    #[test]
    fn test_negative_values_preserved() {
        let record = parse_response("全市-专项转移支付收入: -3,500.7", &catalog());
        assert_eq!(record.value("专项转移支付收入"), Some("-3500.70"));
    }

    #[test]
    fn test_region_tag_optional() {
        let record = parse_response("印花税: 5\n-房产税: 7", &catalog());
        assert_eq!(record.value("印花税"), Some("5.00"));
        assert_eq!(record.value("房产税"), Some("7.00"));
    }

    #[test]
    fn test_full_width_colon_and_label_whitespace() {
        let record = parse_response("全市- 契税 ：  88", &catalog());
        assert_eq!(record.value("契税"), Some("88.00"));
    }

    #[test]
    fn test_prose_interleaved_with_data() {
        let response = "根据表格，提取结果如下：\n全市-税收收入: 100\n说明：部分指标缺失\n全市-非税收入: 20";
        let record = parse_response(response, &catalog());
        assert_eq!(record.len(), 2);
    }
}
