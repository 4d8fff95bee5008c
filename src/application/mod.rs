pub mod batch;
pub mod pipeline;

pub use batch::{BatchError, BatchReport, BatchRunner, BatchSummary, FileFailure, FileSummary, DEFAULT_MAX_FILES};
pub use pipeline::{artifact_name, Analysis, InputFile, ScanOutcome, ScanPipeline, ARTIFACT_SUFFIX};
