//! CSV Adapter
//!
//! Headerless sample input and the outlier report format.

pub mod reader;
pub mod writer;

pub use reader::read_rows;
pub use writer::{parse_report, serialize_report, ReportError, REPORT_HEADER};
