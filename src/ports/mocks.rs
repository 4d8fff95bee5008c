use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::offset::OffsetSource;
use crate::ports::storage::{validate_name, ArtifactStore, StorageError};

/// Offset source that always answers the same offset and records what it was asked
#[derive(Debug, Clone, Default)]
pub struct FixedOffset {
    offset: usize,
    calls: Arc<Mutex<Vec<usize>>>,
}

impl FixedOffset {
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            calls: Arc::default(),
        }
    }

    /// Every `max_offset` this source was asked for
    pub fn get_calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

impl OffsetSource for FixedOffset {
    fn pick(&mut self, max_offset: usize) -> usize {
        self.calls.lock().unwrap().push(max_offset);
        self.offset
    }
}

/// In-memory artifact store that records writes
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    artifacts: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to seed an artifact
    pub fn with_artifact(self, name: &str, contents: &str) -> Self {
        self.artifacts
            .lock()
            .unwrap()
            .insert(name.to_string(), contents.as_bytes().to_vec());
        self
    }

    /// Names of all stored artifacts, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Stored contents as text
    pub fn text(&self, name: &str) -> Option<String> {
        self.artifacts
            .lock()
            .unwrap()
            .get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, name: &str, contents: &[u8]) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        self.artifacts
            .lock()
            .unwrap()
            .insert(name.to_string(), contents.to_vec());
        Ok(PathBuf::from(name))
    }

    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        validate_name(name)?;
        self.artifacts
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }
}
