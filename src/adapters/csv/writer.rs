//! Result Serializer
//!
//! Writes outlier records as CSV with a fixed header, and reads such reports
//! back for display and verification.

use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Writer};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{OutlierRecord, PercentDeviation, ScanError};

/// Report column names, in output order
pub const REPORT_HEADER: [&str; 6] = [
    "stock_id",
    "timestamp",
    "actual_stock_price",
    "mean_of_consecutive_data_points",
    "actual_stock_price_and_mean_difference",
    "percentage_deviation",
];

/// Errors reading a report back
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected report header: {0}")]
    UnexpectedHeader(String),

    #[error("Line {line}: invalid {column} value {value:?}")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Serialize records to CSV text.
///
/// An empty record set is an error: no empty artifact is ever produced.
pub fn serialize_report(records: &[OutlierRecord]) -> Result<String, ScanError> {
    if records.is_empty() {
        return Err(ScanError::NoOutliers);
    }

    let mut buf = Vec::new();
    {
        let mut writer = Writer::from_writer(&mut buf);
        writer.write_record(REPORT_HEADER)?;
        for record in records {
            writer.write_record([
                record.instrument_id.clone(),
                record.timestamp.clone(),
                record.actual_price.to_string(),
                record.window_mean.to_string(),
                record.deviation.to_string(),
                record.percentage_deviation.to_string(),
            ])?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }

    String::from_utf8(buf).map_err(|e| ScanError::Malformed(e.to_string()))
}

/// Parse report text produced by `serialize_report`
pub fn parse_report(text: &str) -> Result<Vec<OutlierRecord>, ReportError> {
    let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());

    let header = reader.headers()?.clone();
    if header.iter().ne(REPORT_HEADER) {
        return Err(ReportError::UnexpectedHeader(header.iter().collect::<Vec<_>>().join(",")));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(parse_row(&row)?);
    }
    Ok(records)
}

fn parse_row(row: &StringRecord) -> Result<OutlierRecord, ReportError> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    let field = |idx: usize| row.get(idx).unwrap_or("");
    let invalid = |idx: usize| ReportError::InvalidField {
        line,
        column: REPORT_HEADER[idx],
        value: field(idx).to_string(),
    };
    let decimal = |idx: usize| Decimal::from_str(field(idx)).map_err(|_| invalid(idx));

    Ok(OutlierRecord {
        instrument_id: field(0).to_string(),
        timestamp: field(1).to_string(),
        actual_price: decimal(2)?,
        window_mean: decimal(3)?,
        deviation: decimal(4)?,
        percentage_deviation: PercentDeviation::from_str(field(5)).map_err(|_| invalid(5))?,
    })
}
