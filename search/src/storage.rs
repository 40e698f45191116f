//! Persistent stores backed by JSON files.

pub mod movies_queries;

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;

pub use movies_queries::{
    FileMoviesQueriesStorage, InMemoryMoviesQueriesStorage, MoviesQueriesStorage,
};

/// Reads and parses `path`. A missing or blank file yields `None`.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&content)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Serializes `value` next to `path` and renames it into place, so readers
/// see either the previous or the new content.
pub(crate) async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let serialized = serde_json::to_vec_pretty(value)?;
    let save_error = |source| StorageError::Save {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(save_error)?;
    }
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, serialized).await.map_err(save_error)?;
    tokio::fs::rename(&tmp, path).await.map_err(save_error)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        name: String,
    }

    #[tokio::test]
    async fn missing_and_blank_files_read_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        assert!(read_json::<Record>(&path).await.unwrap().is_none());

        tokio::fs::write(&path, "  \n").await.unwrap();
        assert!(read_json::<Record>(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_creates_parent_directories_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("record.json");
        let record = Record {
            name: "dune".to_string(),
        };
        write_json_atomic(&path, &record).await.unwrap();

        assert_eq!(read_json::<Record>(&path).await.unwrap(), Some(record));
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn garbage_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.json");
        tokio::fs::write(&path, "{oops").await.unwrap();
        let err = read_json::<Record>(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
