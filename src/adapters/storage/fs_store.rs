//! Filesystem Artifact Store
//!
//! Writes artifacts into a single configured directory, creating it on first
//! write. Names are plain file names only.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::ports::storage::{validate_name, ArtifactStore, StorageError};

/// Artifact store rooted at one directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::DirectoryError {
                path: self.root.clone(),
                source,
            })
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, name: &str, contents: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.path_for(name)?;
        self.ensure_root().await?;

        fs::write(&path, contents)
            .await
            .map_err(|source| StorageError::WriteError {
                name: name.to_string(),
                source,
            })?;

        tracing::info!("Artifact written to {}", path.display());
        Ok(path)
    }

    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(name)?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(source) => Err(StorageError::ReadError {
                name: name.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_creates_directory() {
        let dir = tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("uploads").join("nested"));

        let path = store.put("prices-outliers.csv", b"a,b\n").await.unwrap();

        assert!(path.starts_with(store.root()));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n");
    }

    #[tokio::test]
    async fn test_get_round_trip() {
        let dir = tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        store.put("x.csv", b"first").await.unwrap();
        store.put("x.csv", b"second").await.unwrap();

        assert_eq!(store.get("x.csv").await.unwrap(), b"second".to_vec());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let dir = tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        assert!(matches!(
            store.get("nope.csv").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("root"));

        assert!(matches!(
            store.put("../escape.csv", b"x").await,
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(
            store.get("../escape.csv").await,
            Err(StorageError::InvalidName(_))
        ));
        assert!(!dir.path().join("escape.csv").exists());
    }
}
