//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - CSV: headerless sample input and the outlier report format
//! - Storage: filesystem artifact store
//! - Random: uniform window offsets
//! - CLI: Command-line interface handlers

pub mod cli;
pub mod csv;
pub mod random;
pub mod storage;

pub use cli::CliApp;
pub use random::RandomOffset;
pub use storage::FsArtifactStore;
