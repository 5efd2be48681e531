//! Normalized numeric figures

use std::fmt;

/// A numeric literal that could not be turned into a figure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFormatError {
    literal: String,
}

impl ValueFormatError {
    /// The offending literal, exactly as it appeared in the response
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl fmt::Display for ValueFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid numeric literal '{}'", self.literal)
    }
}

impl std::error::Error for ValueFormatError {}

/// A validated figure: two fractional digits, sign preserved, no grouping
///
/// The stored amount is the *rounded* value, so comparisons between figures
/// behave exactly like comparisons between their rendered strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    amount: f64,
    text: String,
}

impl Figure {
    /// Parse a literal such as `-1,234.5` into a figure
    ///
    /// Thousands separators are removed before parsing. Anything that is not
    /// a finite number afterwards is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscal_domain::Figure;
    ///
    /// let figure = Figure::parse("1,234.5").unwrap();
    /// assert_eq!(figure.as_str(), "1234.50");
    /// assert!(Figure::parse("abc").is_err());
    /// ```
    pub fn parse(literal: &str) -> Result<Self, ValueFormatError> {
        let cleaned: String = literal.trim().chars().filter(|c| *c != ',').collect();
        let value: f64 = cleaned.parse().map_err(|_| ValueFormatError {
            literal: literal.to_string(),
        })?;
        if !value.is_finite() {
            return Err(ValueFormatError {
                literal: literal.to_string(),
            });
        }
        Ok(Self::from_f64(value))
    }

    /// Build a figure from an already parsed value
    pub fn from_f64(value: f64) -> Self {
        let text = format!("{:.2}", value);
        // `{:.2}` output always parses back
        let amount = text.parse().unwrap_or(value);
        Self { amount, text }
    }

    /// Numeric value (rounded to two fractional digits)
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Rendered value, e.g. `"1234.50"`
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Max-wins rule: does `candidate` replace `self`?
    ///
    /// Only a strictly greater value replaces the existing one; ties keep the
    /// original.
    pub fn is_superseded_by(&self, candidate: &Figure) -> bool {
        candidate.amount > self.amount
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
