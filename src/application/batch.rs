//! Batch Runner
//!
//! Processes up to `max_files` files as independent tasks. A failing file is
//! reported next to its siblings and never aborts them.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::application::pipeline::{artifact_name, InputFile, ScanOutcome, ScanPipeline};
use crate::domain::ScanError;
use crate::ports::OffsetSource;

type FileTask = JoinHandle<Result<ScanOutcome, ScanError>>;

/// Default maximum number of files per batch
pub const DEFAULT_MAX_FILES: usize = 2;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No files uploaded")]
    NoFiles,
    #[error("You can upload a maximum of {max} files, got {actual}")]
    TooManyFiles { max: usize, actual: usize },
}

/// A file that failed, with the reason
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: ScanError,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error processing file {}: {}", self.file_name, self.error)
    }
}

impl std::error::Error for FileFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Per-file results, in input order
#[derive(Debug)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub results: Vec<Result<ScanOutcome, FileFailure>>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ScanOutcome> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileFailure> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Names of every artifact written
    pub fn artifact_names(&self) -> Vec<String> {
        self.succeeded().map(|o| o.artifact_name.clone()).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            generated_at: self.generated_at,
            outliers: self.artifact_names(),
            files: self
                .results
                .iter()
                .map(|result| match result {
                    Ok(o) => FileSummary {
                        file: o.file_name.clone(),
                        artifact: Some(o.artifact_name.clone()),
                        outlier_count: Some(o.outlier_count),
                        window_offset: Some(o.window_offset),
                        error_kind: None,
                        error: None,
                    },
                    Err(f) => FileSummary {
                        file: f.file_name.clone(),
                        artifact: None,
                        outlier_count: None,
                        window_offset: None,
                        error_kind: Some(f.error.kind()),
                        error: Some(f.to_string()),
                    },
                })
                .collect(),
        }
    }
}

/// Serializable view of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    /// Artifact names, as the download list
    pub outliers: Vec<String>,
    pub files: Vec<FileSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs a pipeline over a bounded batch of files
#[derive(Clone)]
pub struct BatchRunner {
    pipeline: ScanPipeline,
    max_files: usize,
}

impl BatchRunner {
    pub fn new(pipeline: ScanPipeline, max_files: usize) -> Self {
        Self {
            pipeline,
            max_files,
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Check the batch size before any work starts
    pub fn check_batch(&self, count: usize) -> Result<(), BatchError> {
        if count == 0 {
            return Err(BatchError::NoFiles);
        }
        if count > self.max_files {
            return Err(BatchError::TooManyFiles {
                max: self.max_files,
                actual: count,
            });
        }
        Ok(())
    }

    /// Process every file on its own task.
    ///
    /// `offsets_for(i)` supplies the offset source for the i-th file. A file
    /// whose report name is already taken by an earlier file in the batch
    /// fails with `DuplicateArtifact` and is never run.
    pub async fn run<F>(
        &self,
        files: Vec<InputFile>,
        mut offsets_for: F,
    ) -> Result<BatchReport, BatchError>
    where
        F: FnMut(usize) -> Box<dyn OffsetSource>,
    {
        self.check_batch(files.len())?;
        tracing::info!("Starting batch of {} file(s)", files.len());

        let mut claimed: HashMap<String, String> = HashMap::new();
        let mut pending: Vec<(String, Result<FileTask, ScanError>)> = Vec::with_capacity(files.len());

        for (idx, file) in files.into_iter().enumerate() {
            let file_name = file.name.clone();
            let artifact = artifact_name(&file_name);
            if let Some(first_file) = claimed.get(&artifact) {
                let error = ScanError::DuplicateArtifact {
                    artifact,
                    first_file: first_file.clone(),
                };
                pending.push((file_name, Err(error)));
                continue;
            }
            claimed.insert(artifact, file_name.clone());

            let pipeline = self.pipeline.clone();
            let mut offsets = offsets_for(idx);
            let handle = tokio::spawn(async move {
                pipeline.process_file(&file, offsets.as_mut()).await
            });
            pending.push((file_name, Ok(handle)));
        }

        let mut results = Vec::with_capacity(pending.len());
        for (file_name, task) in pending {
            let result = match task {
                Err(error) => Err(FileFailure { file_name, error }),
                Ok(handle) => match handle.await {
                    Ok(Ok(outcome)) => Ok(outcome),
                    Ok(Err(error)) => Err(FileFailure { file_name, error }),
                    Err(join_err) => Err(FileFailure {
                        file_name,
                        error: ScanError::TaskFailed(join_err.to_string()),
                    }),
                },
            };
            if let Err(failure) = &result {
                tracing::warn!("{}", failure);
            }
            results.push(result);
        }

        let report = BatchReport {
            generated_at: Utc::now(),
            results,
        };
        tracing::info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded().count(),
            report.failure_count()
        );
        Ok(report)
    }
}
