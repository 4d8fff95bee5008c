//! Scan Pipeline
//!
//! Runs one file through parse -> window -> detect -> serialize -> store.
//! Holds only immutable configuration and the storage port, so one pipeline
//! can serve many files concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::csv::{read_rows, serialize_report};
use crate::detection::{DetectionConfig, OutlierDetector, ParamsError, WindowSelector, WindowStats};
use crate::domain::{parse_rows, OutlierRecord, ScanError};
use crate::ports::{ArtifactStore, OffsetSource};

/// Suffix appended to the input stem to name the artifact
pub const ARTIFACT_SUFFIX: &str = "-outliers.csv";

/// An input file held in memory
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// In-memory result of analyzing one file
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub total_samples: usize,
    pub window_offset: usize,
    pub stats: WindowStats,
    pub outliers: Vec<OutlierRecord>,
}

/// A file that produced an artifact
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub file_name: String,
    pub artifact_name: String,
    pub artifact_path: PathBuf,
    pub outlier_count: usize,
    pub window_offset: usize,
    pub stats: WindowStats,
}

/// Artifact name for an input file: the name up to its first `.`, plus the suffix
pub fn artifact_name(input_name: &str) -> String {
    let base = Path::new(input_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(input_name);
    let stem = base.split('.').next().unwrap_or(base);
    format!("{}{}", stem, ARTIFACT_SUFFIX)
}

/// Per-file outlier scan
#[derive(Clone)]
pub struct ScanPipeline {
    selector: WindowSelector,
    detector: OutlierDetector,
    store: Arc<dyn ArtifactStore>,
}

impl ScanPipeline {
    pub fn new(config: DetectionConfig, store: Arc<dyn ArtifactStore>) -> Result<Self, ParamsError> {
        config.validate()?;
        Ok(Self {
            selector: WindowSelector::new(config.window_len),
            detector: OutlierDetector::new(config),
            store,
        })
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Parse, select a window and detect outliers. No I/O.
    pub fn analyze(
        &self,
        input: &[u8],
        offsets: &mut dyn OffsetSource,
    ) -> Result<Analysis, ScanError> {
        let rows = read_rows(input)?;
        let samples = parse_rows(&rows)?;
        let window = self.selector.select(&samples, offsets)?;
        let detection = self.detector.detect(&window)?;

        Ok(Analysis {
            total_samples: samples.len(),
            window_offset: window.start_offset(),
            stats: detection.stats,
            outliers: detection.outliers,
        })
    }

    /// Analyze a file and store its report.
    ///
    /// Nothing is stored when any step fails.
    pub async fn process_file(
        &self,
        file: &InputFile,
        offsets: &mut dyn OffsetSource,
    ) -> Result<ScanOutcome, ScanError> {
        tracing::info!("Processing file {} ({} bytes)", file.name, file.contents.len());

        let analysis = self.analyze(&file.contents, offsets)?;
        tracing::debug!(
            "{}: {} samples, window at offset {}, {} outliers",
            file.name,
            analysis.total_samples,
            analysis.window_offset,
            analysis.outliers.len()
        );

        let report = serialize_report(&analysis.outliers)?;
        let name = artifact_name(&file.name);
        let path = self.store.put(&name, report.as_bytes()).await?;

        tracing::info!("Outliers for {} written to {}", file.name, name);

        Ok(ScanOutcome {
            file_name: file.name.clone(),
            artifact_name: name,
            artifact_path: path,
            outlier_count: analysis.outliers.len(),
            window_offset: analysis.window_offset,
            stats: analysis.stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv::parse_report;
    use crate::ports::mocks::{FixedOffset, MemoryArtifactStore};
    use crate::ports::storage::StorageError;
    use async_trait::async_trait;
    use mockall::mock;
    use rust_decimal_macros::dec;

    mock! {
        Store {}

        #[async_trait]
        impl ArtifactStore for Store {
            async fn put(&self, name: &str, contents: &[u8]) -> Result<PathBuf, StorageError>;
            async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError>;
        }
    }

    fn csv_from_prices(prices: &[&str]) -> Vec<u8> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| format!("FLTR,{:02}-09-2023,{}\n", i + 1, p))
            .collect::<String>()
            .into_bytes()
    }

    fn spike_csv() -> Vec<u8> {
        let mut prices = vec!["100"; 29];
        prices.push("500");
        prices.extend(["100"; 5]);
        csv_from_prices(&prices)
    }

    fn pipeline(store: MemoryArtifactStore) -> ScanPipeline {
        ScanPipeline::new(DetectionConfig::default(), Arc::new(store)).unwrap()
    }

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name("prices.csv"), "prices-outliers.csv");
        assert_eq!(artifact_name("LSE.FLTR.csv"), "LSE-outliers.csv");
        assert_eq!(artifact_name("data/in/NYSE.csv"), "NYSE-outliers.csv");
        assert_eq!(artifact_name("noext"), "noext-outliers.csv");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ScanPipeline::new(
            DetectionConfig::default().with_window_len(0),
            Arc::new(MemoryArtifactStore::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_spike() {
        let p = pipeline(MemoryArtifactStore::new());
        let analysis = p.analyze(&spike_csv(), &mut FixedOffset::new(0)).unwrap();

        assert_eq!(analysis.total_samples, 35);
        assert_eq!(analysis.window_offset, 0);
        assert_eq!(analysis.outliers.len(), 1);
        assert_eq!(analysis.outliers[0].timestamp, "30-09-2023");
        assert_eq!(analysis.outliers[0].window_mean, dec!(113.33));
    }

    #[test]
    fn test_analyze_empty_input() {
        let p = pipeline(MemoryArtifactStore::new());
        let result = p.analyze(b"", &mut FixedOffset::new(0));
        assert!(matches!(result, Err(ScanError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_process_file_stores_report() {
        let store = MemoryArtifactStore::new();
        let p = pipeline(store.clone());
        let file = InputFile::new("FLTR.csv", spike_csv());

        let outcome = p.process_file(&file, &mut FixedOffset::new(0)).await.unwrap();

        assert_eq!(outcome.artifact_name, "FLTR-outliers.csv");
        assert_eq!(outcome.outlier_count, 1);
        let records = parse_report(&store.text("FLTR-outliers.csv").unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actual_price, dec!(500.00));
    }

    #[tokio::test]
    async fn test_no_outliers_stores_nothing() {
        let store = MemoryArtifactStore::new();
        let p = pipeline(store.clone());
        let file = InputFile::new("flat.csv", csv_from_prices(&["100"; 30]));

        let err = p.process_file(&file, &mut FixedOffset::new(0)).await.unwrap_err();

        assert!(matches!(err, ScanError::NoOutliers));
        assert!(store.names().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let mut store = MockStore::new();
        store.expect_put().times(1).returning(|name, _| {
            Err(StorageError::WriteError {
                name: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        });
        let p = ScanPipeline::new(DetectionConfig::default(), Arc::new(store)).unwrap();
        let file = InputFile::new("FLTR.csv", spike_csv());

        let err = p.process_file(&file, &mut FixedOffset::new(0)).await.unwrap_err();
        assert!(matches!(err, ScanError::Storage(StorageError::WriteError { .. })));
    }

    #[tokio::test]
    async fn test_detection_failure_never_touches_store() {
        let mut store = MockStore::new();
        store.expect_put().times(0);
        let p = ScanPipeline::new(DetectionConfig::default(), Arc::new(store)).unwrap();

        let mut prices = vec!["100"; 30];
        prices[4] = "abc";
        let file = InputFile::new("bad.csv", csv_from_prices(&prices));

        let err = p.process_file(&file, &mut FixedOffset::new(0)).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidPriceData { .. }));
    }
}
