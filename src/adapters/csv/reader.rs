//! CSV input reader
//!
//! Reads headerless CSV text into positional raw rows. Every record is data;
//! ragged rows are kept and blank lines are skipped. Fields are decoded
//! lossily, so invalid UTF-8 only matters if it lands in a window price.

use csv::ReaderBuilder;

use crate::domain::{RawRow, ScanError};

/// Read all rows from CSV bytes, in file order
pub fn read_rows(input: &[u8]) -> Result<Vec<RawRow>, ScanError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        rows.push(RawRow::new(
            record.iter().map(|field| String::from_utf8_lossy(field).into_owned()),
        ));
    }
    Ok(rows)
}
