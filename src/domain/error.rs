//! Per-file scan errors
//!
//! Every variant is terminal for the file being processed.

use thiserror::Error;

use crate::ports::storage::StorageError;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("CSV file is empty")]
    EmptyInput,

    #[error("Not enough data points in the file: need {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid stock price data: {raw:?} for {instrument_id} at {timestamp}")]
    InvalidPriceData {
        instrument_id: String,
        timestamp: String,
        raw: String,
    },

    #[error("No outliers detected")]
    NoOutliers,

    #[error("Window offset {offset} out of range (max {max})")]
    OffsetOutOfRange { offset: usize, max: usize },

    #[error("Malformed CSV: {0}")]
    Malformed(String),

    /// Report amounts are `Decimal`, which tops out near ±7.9e28. A window
    /// statistic or flagged price beyond that fails the file.
    #[error("Value {0} is outside the reportable range of about ±7.9e28")]
    Unrepresentable(f64),

    #[error("Report {artifact} is already produced by {first_file} in this batch")]
    DuplicateArtifact { artifact: String, first_file: String },

    #[error("Processing task failed: {0}")]
    TaskFailed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ScanError {
    /// Short machine-readable tag, used in JSON summaries
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::EmptyInput => "empty_input",
            ScanError::InsufficientData { .. } => "insufficient_data",
            ScanError::InvalidPriceData { .. } => "invalid_price_data",
            ScanError::NoOutliers => "no_outliers",
            ScanError::OffsetOutOfRange { .. } => "offset_out_of_range",
            ScanError::Malformed(_) => "malformed",
            ScanError::Unrepresentable(_) => "unrepresentable",
            ScanError::DuplicateArtifact { .. } => "duplicate_artifact",
            ScanError::TaskFailed(_) => "task_failed",
            ScanError::Storage(_) => "storage",
        }
    }
}

impl From<csv::Error> for ScanError {
    fn from(e: csv::Error) -> Self {
        ScanError::Malformed(e.to_string())
    }
}
