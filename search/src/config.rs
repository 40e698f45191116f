use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGES_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Settings of the whole application, as stored in the TOML config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfiguration {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub api: ApiConfig,
    pub images: ImagesConfig,
    pub storage: StorageConfig,
    pub network: NetworkSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as the `api_key` query parameter on every API request
    pub api_key: String,
    /// Preferred response language, sent as the `language` query parameter
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// How many recent queries are kept
    pub max_recent_queries: usize,
    /// Recent queries file; kept in memory when unset
    pub queries_path: Option<PathBuf>,
    /// Response cache file; kept in memory when unset
    pub cache_path: Option<PathBuf>,
    /// Cached pages older than this are refetched; never expire when unset
    pub cache_max_age_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub timeout_seconds: u64,
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            api: ApiConfig::default(),
            images: ImagesConfig::default(),
            storage: StorageConfig::default(),
            network: NetworkSettings::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            language: "en".to_string(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IMAGES_BASE_URL.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_recent_queries: 10,
            queries_path: Some(PathBuf::from("recent_queries.json")),
            cache_path: None,
            cache_max_age_seconds: None,
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}
