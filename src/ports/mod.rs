//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Window offset selection (randomness)
//! - Artifact storage

pub mod mocks;
pub mod offset;
pub mod storage;

pub use offset::OffsetSource;
pub use storage::{ArtifactStore, StorageError};
