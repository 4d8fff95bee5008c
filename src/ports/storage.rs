use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Artifact storage error type
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid artifact name: {0:?}")]
    InvalidName(String),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write artifact {name}: {source}")]
    WriteError {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read artifact {name}: {source}")]
    ReadError {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Check that `name` is a plain file name with no path components
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Where finished artifacts go, and where `show` reads them back from
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `contents` under `name`, returning the location written
    async fn put(&self, name: &str, contents: &[u8]) -> Result<PathBuf, StorageError>;

    /// Read a previously stored artifact
    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_accepted() {
        assert!(validate_name("prices-outliers.csv").is_ok());
        assert!(validate_name(".hidden").is_ok());
    }

    #[test]
    fn test_path_like_names_rejected() {
        for name in ["", ".", "..", "../etc/passwd", "a/b.csv", "a\\b.csv", "nul\0.csv"] {
            assert!(
                matches!(validate_name(name), Err(StorageError::InvalidName(_))),
                "name = {:?}",
                name
            );
        }
    }
}
