//! Domain Layer - Core types for windowed outlier detection
//!
//! Pure data and parsing with no I/O. External interactions happen through
//! the ports layer.
//!
//! - `sample`: raw rows, tagged prices and the Sample Parser
//! - `outlier`: outlier records and cent rounding
//! - `error`: per-file scan errors

pub mod error;
pub mod outlier;
pub mod sample;

pub use error::ScanError;
pub use outlier::{round_cents, OutlierRecord, PercentDeviation, UNDEFINED_SENTINEL};
pub use sample::{parse_rows, Price, RawRow, Sample};
