//! Storage Adapter
//!
//! Filesystem implementation of the artifact store port.

mod fs_store;

pub use fs_store::FsArtifactStore;
