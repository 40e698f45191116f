use std::{fs, path::Path};

use log::debug;
use reqwest::Url;

use crate::{cli::Cli, config::AppConfiguration, container::cache_policy, error::ConfigError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Loads, saves and validates the TOML configuration file.
pub struct ConfigManager {
    config: AppConfiguration,
}

impl ConfigManager {
    /// Loads the configuration at `path`. A missing file yields the defaults;
    /// an unreadable or invalid one is an error.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(Self {
            config: Self::load_config(path)?,
        })
    }

    pub fn from_config(config: AppConfiguration) -> Self {
        Self { config }
    }

    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfiguration, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no config file at {}, using defaults", path.display());
            return Ok(AppConfiguration::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(&self.config)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes a default configuration file at `path`.
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        Self::from_config(AppConfiguration::default()).save_config(path)
    }

    pub fn config(&self) -> &AppConfiguration {
        &self.config
    }

    pub fn into_config(self) -> AppConfiguration {
        self.config
    }

    /// Command-line values override the file.
    pub fn merge_with_cli_args(&mut self, cli: &Cli) {
        if let Some(api_key) = &cli.api_key {
            self.config.api.api_key = api_key.clone();
        }
        if let Some(log_level) = &cli.log_level {
            self.config.log_level = log_level.clone();
        }
    }

    pub fn validate_config(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if Url::parse(&self.config.api.base_url).is_err() {
            errors.push(format!("Invalid API base URL: {}", self.config.api.base_url));
        }
        if Url::parse(&self.config.images.base_url).is_err() {
            errors.push(format!("Invalid images base URL: {}", self.config.images.base_url));
        }
        if self.config.api.api_key.is_empty() {
            errors.push("API key is not set".to_string());
        }
        if self.config.storage.max_recent_queries == 0 {
            errors.push("max_recent_queries must be greater than 0".to_string());
        }
        if self.config.network.timeout_seconds == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }
        if cache_policy(self.config.storage.cache_max_age_seconds).is_err() {
            errors.push("cache_max_age_seconds is too large".to_string());
        }
        if !LOG_LEVELS.contains(&self.config.log_level.as_str()) {
            errors.push("Log level must be one of: trace, debug, info, warn, error".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(dir.path().join("absent.toml")).unwrap();
        assert_eq!(manager.config(), &AppConfiguration::default());
    }

    #[test]
    fn default_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies-search.toml");
        ConfigManager::create_default_config(&path).unwrap();

        let manager = ConfigManager::new(&path).unwrap();
        assert_eq!(manager.config().api.language, "en");
        assert_eq!(manager.config().storage.max_recent_queries, 10);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies-search.toml");
        fs::write(&path, "[api]\napi_key = \"secret\"\n\n[storage]\nmax_recent_queries = 3\n").unwrap();

        let config = ConfigManager::load_config(&path).unwrap();
        assert_eq!(config.api.api_key, "secret");
        assert_eq!(config.api.base_url, crate::config::DEFAULT_API_BASE_URL);
        assert_eq!(config.storage.max_recent_queries, 3);
        assert_eq!(config.network.timeout_seconds, 30);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies-search.toml");
        fs::write(&path, "[api\n").unwrap();
        assert!(matches!(ConfigManager::new(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn cli_values_override_file() {
        let cli = Cli::parse_from(["movies-search", "batman", "--api-key", "k", "--log-level", "debug"]);
        let mut manager = ConfigManager::from_config(AppConfiguration::default());
        manager.merge_with_cli_args(&cli);

        assert_eq!(manager.config().api.api_key, "k");
        assert_eq!(manager.config().log_level, "debug");
        assert!(manager.validate_config().is_ok());
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut config = AppConfiguration::default();
        config.api.base_url = "not a url".to_string();
        config.storage.max_recent_queries = 0;
        config.log_level = "loud".to_string();

        let errors = ConfigManager::from_config(config).validate_config().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn validation_rejects_unrepresentable_cache_age() {
        let mut config = AppConfiguration::default();
        config.api.api_key = "key".to_string();
        config.storage.cache_max_age_seconds = Some(u64::MAX);

        let errors = ConfigManager::from_config(config).validate_config().unwrap_err();
        assert_eq!(errors, vec!["cache_max_age_seconds is too large".to_string()]);
    }
}
