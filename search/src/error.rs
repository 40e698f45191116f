use std::{io, path::PathBuf};

use movies_client::DataTransferError;
use thiserror::Error;

/// Failures of the persistent stores (recent queries, response cache).
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt data in {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode stored data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced by repositories and use cases.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Transfer(#[from] DataTransferError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
