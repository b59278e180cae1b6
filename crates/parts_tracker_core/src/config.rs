//! Tracker runtime configuration.
//!
//! # Responsibility
//! - Describe where the tracker stores its document and how it logs.
//! - Load settings from an optional JSON file plus environment overrides.
//!
//! # Invariants
//! - Every field has a default; an absent file is not an error.

use crate::logging::default_log_level;
use crate::repo::state_repo::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "PARTS_TRACKER_DB";
pub const LOG_LEVEL_ENV: &str = "PARTS_TRACKER_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "parts_tracker.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// SQLite file holding the key-value store.
    pub database_path: PathBuf,
    /// Key the tracker document is stored under.
    pub storage_key: String,
    pub log_level: String,
    /// Absolute directory for rolling log files. Logging is off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Applies `PARTS_TRACKER_DB` / `PARTS_TRACKER_LOG_LEVEL` when set and
    /// non-blank.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(path) = non_blank(DB_PATH_ENV) {
            self.database_path = PathBuf::from(path.trim());
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            self.log_level = level.trim().to_string();
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Reads `path` (defaults when it does not exist), then applies environment
/// overrides.
pub fn load_config(path: impl AsRef<Path>) -> Result<TrackerConfig, ConfigError> {
    let mut config = read_config_file(path.as_ref())?.unwrap_or_default();
    config.apply_env_overrides();
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Option<TrackerConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::{read_config_file, TrackerConfig, DB_PATH_ENV, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_config_file(&dir.path().join("absent.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.json");
        std::fs::write(&path, r#"{ "storage_key": "custom" }"#).unwrap();

        let config = read_config_file(&path).unwrap().unwrap();
        assert_eq!(config.storage_key, "custom");
        assert_eq!(config.database_path, PathBuf::from("parts_tracker.sqlite3"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.json");
        std::fs::write(&path, "{ storage_key").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let mut config = TrackerConfig::default();
        config.apply_overrides(|name| match name {
            DB_PATH_ENV => Some(" /data/tracker.sqlite3 ".to_string()),
            LOG_LEVEL_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.database_path, PathBuf::from("/data/tracker.sqlite3"));
        assert_eq!(config.log_level, TrackerConfig::default().log_level);
    }
}
