//! Runtime configuration for the message store.
//!
//! # Responsibility
//! - Resolve database location and logging settings from the environment.
//! - Validate settings before any storage or logger is opened.
//!
//! # Invariants
//! - Empty or whitespace-only variables count as unset.
//! - Logging stays disabled unless a log directory is configured.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_ENV: &str = "POSTBOX_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "POSTBOX_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "POSTBOX_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "postbox.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid POSTBOX_LOG_LEVEL: {0}")]
    LogLevel(LoggingError),
    #[error("POSTBOX_LOG_DIR must be an absolute path, got `{0}`")]
    RelativeLogDir(String),
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Canonical level name (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Rolling log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&level).map_err(ConfigError::LogLevel)?;
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.display().to_string()));
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }

    /// Overrides the database location.
    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}
