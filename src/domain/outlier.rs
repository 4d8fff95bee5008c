//! Outlier records
//!
//! Reporting values are rounded to cents half-away-from-zero on the exact
//! binary value of the double, then fixed at scale 2.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::error::ScanError;

/// Text written for an undefined percentage deviation
pub const UNDEFINED_SENTINEL: &str = "undefined";

/// Round a double to 2 decimal places for reporting.
///
/// Magnitudes beyond the `Decimal` range (about 7.9e28) are `Unrepresentable`.
pub fn round_cents(value: f64) -> Result<Decimal, ScanError> {
    // Anything this small rounds to zero at 2 places
    if value.is_finite() && value.abs() < 1e-3 {
        return Ok(Decimal::new(0, 2));
    }
    let exact = Decimal::from_f64_retain(value).ok_or(ScanError::Unrepresentable(value))?;
    let mut rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    Ok(rounded)
}

/// Deviation relative to the outlier threshold, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentDeviation {
    Value(Decimal),
    /// Threshold collapsed to zero (or below double precision) for a flagged sample
    Undefined,
}

impl PercentDeviation {
    /// Compute `deviation / threshold * 100`; non-finite results become `Undefined`
    pub fn compute(deviation: f64, threshold: f64) -> Result<Self, ScanError> {
        let pct = deviation / threshold * 100.0;
        if !pct.is_finite() {
            return Ok(PercentDeviation::Undefined);
        }
        Ok(PercentDeviation::Value(round_cents(pct)?))
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            PercentDeviation::Value(v) => Some(*v),
            PercentDeviation::Undefined => None,
        }
    }
}

impl fmt::Display for PercentDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentDeviation::Value(v) => write!(f, "{}", v),
            PercentDeviation::Undefined => f.write_str(UNDEFINED_SENTINEL),
        }
    }
}

impl FromStr for PercentDeviation {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == UNDEFINED_SENTINEL {
            return Ok(PercentDeviation::Undefined);
        }
        Decimal::from_str(s.trim()).map(PercentDeviation::Value)
    }
}

/// One flagged sample within a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRecord {
    pub instrument_id: String,
    pub timestamp: String,
    pub actual_price: Decimal,
    pub window_mean: Decimal,
    pub deviation: Decimal,
    pub percentage_deviation: PercentDeviation,
}

impl OutlierRecord {
    /// Build a record from raw window statistics.
    ///
    /// `deviation` is taken against the unrounded mean.
    pub fn from_stats(
        instrument_id: &str,
        timestamp: &str,
        price: f64,
        mean: f64,
        threshold: f64,
    ) -> Result<Self, ScanError> {
        let deviation = price - mean;
        Ok(Self {
            instrument_id: instrument_id.to_string(),
            timestamp: timestamp.to_string(),
            actual_price: round_cents(price)?,
            window_mean: round_cents(mean)?,
            deviation: round_cents(deviation)?,
            percentage_deviation: PercentDeviation::compute(deviation, threshold)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_fixed_scale() {
        assert_eq!(round_cents(100.0).unwrap().to_string(), "100.00");
        assert_eq!(round_cents(113.333_333).unwrap().to_string(), "113.33");
        assert_eq!(round_cents(-13.336).unwrap().to_string(), "-13.34");
    }

    #[test]
    fn test_round_cents_exact_midpoint_goes_away_from_zero() {
        // 0.125 and 2.375 are exact in binary
        assert_eq!(round_cents(0.125).unwrap(), dec!(0.13));
        assert_eq!(round_cents(-2.375).unwrap(), dec!(-2.38));
    }

    #[test]
    fn test_round_cents_uses_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(round_cents(1.005).unwrap(), dec!(1.00));
    }

    #[test]
    fn test_round_cents_tiny_values_are_zero() {
        assert_eq!(round_cents(-1e-9).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_round_cents_rejects_non_finite() {
        assert!(matches!(round_cents(f64::NAN), Err(ScanError::Unrepresentable(_))));
        assert!(matches!(round_cents(f64::INFINITY), Err(ScanError::Unrepresentable(_))));
    }

    #[test]
    fn test_round_cents_beyond_decimal_range() {
        let err = round_cents(1e30).unwrap_err();
        assert!(matches!(err, ScanError::Unrepresentable(v) if v == 1e30));
        assert!(err.to_string().contains("reportable range"));
    }

    #[test]
    fn test_percent_deviation_uses_threshold_denominator() {
        let pct = PercentDeviation::compute(50.0, 200.0).unwrap();
        assert_eq!(pct, PercentDeviation::Value(dec!(25.00)));
    }

    #[test]
    fn test_percent_deviation_zero_threshold_is_undefined() {
        assert_eq!(PercentDeviation::compute(1e-300, 0.0).unwrap(), PercentDeviation::Undefined);
        assert_eq!(PercentDeviation::compute(0.0, 0.0).unwrap(), PercentDeviation::Undefined);
    }

    #[test]
    fn test_percent_deviation_text() {
        assert_eq!(PercentDeviation::Undefined.to_string(), "undefined");
        assert_eq!("undefined".parse::<PercentDeviation>().unwrap(), PercentDeviation::Undefined);
        assert_eq!(
            "-12.50".parse::<PercentDeviation>().unwrap(),
            PercentDeviation::Value(dec!(-12.50))
        );
        assert!("n/a".parse::<PercentDeviation>().is_err());
    }

    #[test]
    fn test_record_from_stats() {
        let record = OutlierRecord::from_stats("TSLA", "t29", 500.0, 3400.0 / 30.0, 143.6044).unwrap();

        assert_eq!(record.instrument_id, "TSLA");
        assert_eq!(record.actual_price.to_string(), "500.00");
        assert_eq!(record.window_mean.to_string(), "113.33");
        assert_eq!(record.deviation.to_string(), "386.67");
    }
}
