//! outlier-scan - Windowed Outlier Detection Library
//!
//! Flags stock price samples that sit more than 2 population standard
//! deviations from the mean of a random 30-sample window.
//!
//! # Modules
//!
//! - `domain`: Core types (Sample, Price, OutlierRecord, ScanError)
//! - `ports`: Trait abstractions (OffsetSource, ArtifactStore)
//! - `detection`: Window selection and outlier classification
//! - `adapters`: External implementations (CSV, filesystem, RNG, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Per-file pipeline and batch runner

pub mod domain;
pub mod ports;
pub mod detection;
pub mod adapters;
pub mod config;
pub mod application;
