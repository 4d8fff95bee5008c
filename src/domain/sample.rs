//! Samples and the Sample Parser
//!
//! Turns positional raw rows (instrument id, timestamp, price text) into typed
//! samples. Parsing is tolerant: a price that cannot be read is kept as
//! `Price::Invalid` and only rejected once statistics are computed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::ScanError;

/// One positional input row, exactly as read from the source text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Field at `idx`, or an empty string for short rows
    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// Price of a sample: either a finite number or the text that failed to parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Price {
    Valid(f64),
    Invalid(String),
}

impl Price {
    /// Parse price text. Empty, non-numeric and non-finite values are `Invalid`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Price::Valid(value),
            _ => Price::Invalid(raw.to_string()),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Price::Valid(v) => Some(*v),
            Price::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Price::Valid(_))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Valid(v) => write!(f, "{}", v),
            Price::Invalid(raw) => write!(f, "invalid({:?})", raw),
        }
    }
}

/// A single (instrument, timestamp, price) observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    instrument_id: String,
    timestamp: String,
    price: Price,
}

impl Sample {
    pub fn new(instrument_id: impl Into<String>, timestamp: impl Into<String>, price: Price) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            timestamp: timestamp.into(),
            price,
        }
    }

    /// Build a sample from a raw row. Never fails; see module docs.
    pub fn from_row(row: &RawRow) -> Self {
        Self::new(row.field(0), row.field(1), Price::parse(row.field(2)))
    }

    pub fn instrument_id(&self) -> &str {
        &self.instrument_id
    }

    /// Timestamp label, verbatim from the input
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn price(&self) -> &Price {
        &self.price
    }
}

/// Parse every row into a sample, preserving file order.
///
/// Fails only when there are no rows at all.
pub fn parse_rows(rows: &[RawRow]) -> Result<Vec<Sample>, ScanError> {
    if rows.is_empty() {
        return Err(ScanError::EmptyInput);
    }
    Ok(rows.iter().map(Sample::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_row() {
        let row = RawRow::new(["AAPL", "01-02-2023 09:30:00", "150.25"]);
        let sample = Sample::from_row(&row);

        assert_eq!(sample.instrument_id(), "AAPL");
        assert_eq!(sample.timestamp(), "01-02-2023 09:30:00");
        assert_eq!(sample.price(), &Price::Valid(150.25));
    }

    #[test]
    fn test_price_text_is_trimmed() {
        assert_eq!(Price::parse("  42.5 "), Price::Valid(42.5));
        assert_eq!(Price::parse("-3"), Price::Valid(-3.0));
    }

    #[test]
    fn test_invalid_prices_are_tagged_not_rejected() {
        for raw in ["abc", "", "   ", "NaN", "inf", "-infinity", "12abc"] {
            let price = Price::parse(raw);
            assert_eq!(price, Price::Invalid(raw.to_string()), "raw = {:?}", raw);
            assert!(!price.is_valid());
            assert_eq!(price.value(), None);
        }
    }

    #[test]
    fn test_short_row_gets_empty_fields() {
        let sample = Sample::from_row(&RawRow::new(["ONLY_ID"]));
        assert_eq!(sample.instrument_id(), "ONLY_ID");
        assert_eq!(sample.timestamp(), "");
        assert_eq!(sample.price(), &Price::Invalid(String::new()));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let sample = Sample::from_row(&RawRow::new(["X", "t0", "1.5", "extra", "more"]));
        assert_eq!(sample.price().value(), Some(1.5));
    }

    #[test]
    fn test_parse_rows_keeps_order() {
        let rows: Vec<RawRow> = (0..5)
            .map(|i| RawRow::new(["ID".to_string(), format!("t{}", i), format!("{}", 10 - i)]))
            .collect();

        let samples = parse_rows(&rows).unwrap();
        let stamps: Vec<&str> = samples.iter().map(|s| s.timestamp()).collect();
        assert_eq!(stamps, vec!["t0", "t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn test_parse_rows_empty_input() {
        assert!(matches!(parse_rows(&[]), Err(ScanError::EmptyInput)));
    }

    #[test]
    fn test_bad_row_does_not_fail_parse() {
        let rows = vec![
            RawRow::new(["A", "t0", "1.0"]),
            RawRow::new(["A", "t1", "oops"]),
        ];
        let samples = parse_rows(&rows).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(!samples[1].price().is_valid());
    }
}
