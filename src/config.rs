//! Configuration management for taskflow.
//!
//! This module handles the `config.yaml` file in the data directory, which
//! stores user preferences that are not part of the task data itself.

use crate::error::Result;
use crate::paths;
use crate::tasks::Sort;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default sort criteria when none are configured.
pub const DEFAULT_SORT: &str = "manual-asc";

/// Default log level when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Path of the `SQLite` database.
    /// None means `taskflow.sqlite3` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Initial sort criteria for listings, e.g. `created-desc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,

    /// Directory exports are written to.
    /// None means the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load config from a data directory, returning None if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(data_dir: &Path) -> Result<Option<Self>> {
        let config_path = paths::config_path(data_dir);
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Load config from a data directory, falling back to defaults.
    ///
    /// An unreadable config file is logged and ignored.
    pub fn load_or_default(data_dir: &Path) -> Self {
        match Self::load_from(data_dir) {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, data_dir: &Path) -> Result<()> {
        let config_path = paths::config_path(data_dir);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// The database path to use for a data directory.
    #[must_use]
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database.clone().unwrap_or_else(|| paths::db_path(data_dir))
    }

    /// The initial sort criteria.
    #[must_use]
    pub fn default_view(&self) -> Sort {
        Sort::parse(self.default_sort.as_deref().unwrap_or(DEFAULT_SORT))
    }

    /// The directory exports are written to.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// The configured log level.
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{SortDirection, SortKey};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load_from(dir.path()).unwrap(), None);
        assert_eq!(Config::load_or_default(dir.path()), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("taskflow");
        let config = Config {
            database: Some(PathBuf::from("/tmp/tasks.sqlite3")),
            default_sort: Some("created-desc".to_string()),
            export_dir: None,
            log_level: Some("debug".to_string()),
        };

        config.save_to(&data_dir).unwrap();
        assert_eq!(Config::load_from(&data_dir).unwrap(), Some(config));
    }

    #[test]
    fn test_partial_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::config_path(dir.path()), "default_sort: priority-desc\n").unwrap();

        let config = Config::load_from(dir.path()).unwrap().unwrap();
        assert_eq!(config.default_view(), Sort::new(SortKey::Priority, SortDirection::Desc));
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.database_path(dir.path()), paths::db_path(dir.path()));
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::config_path(dir.path()), "default_sort: [unclosed\n").unwrap();

        assert!(Config::load_from(dir.path()).is_err());
        assert_eq!(Config::load_or_default(dir.path()), Config::default());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_view(), Sort::default());
        assert_eq!(config.export_dir(), PathBuf::from("."));
        assert_eq!(config.log_level(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_default_config_serializes_empty() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}
