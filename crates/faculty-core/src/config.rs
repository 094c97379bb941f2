//! Configuration for the faculty registry
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! log_filter = "faculty_core=debug,info"
//!
//! [database]
//! path = "/var/lib/faculty/faculty.db"
//! busy_timeout_ms = 5000
//! ```
//!
//! Missing keys fall back to their defaults. `FACULTY_DB` overrides the
//! database path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FacultyError, Result};

/// Environment variable overriding the database path
pub const DATABASE_ENV: &str = "FACULTY_DB";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacultyConfig {
    /// Database settings
    pub database: DatabaseConfig,
    /// `tracing-subscriber` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for FacultyConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; `None` means the platform data directory
    pub path: Option<PathBuf>,
    /// How long a writer waits for another connection's lock
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Resolved database file: explicit path, else `<data dir>/faculty/faculty.db`.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("faculty").join("faculty.db"))
            .ok_or_else(|| FacultyError::Config("no platform data directory".to_string()))
    }
}

impl FacultyConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FacultyError::Config(e.to_string()))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FacultyError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Default config file location: `<config dir>/faculty/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("faculty").join("config.toml"))
    }

    /// Load from `path` if given, else from the default location if it
    /// exists, else use defaults. Applies the environment override last.
    pub fn load_standard(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(default) if default.is_file() => Self::load(&default)?,
                _ => Self::default(),
            },
        };
        config.apply_env(std::env::var_os(DATABASE_ENV).map(PathBuf::from));
        Ok(config)
    }

    fn apply_env(&mut self, database: Option<PathBuf>) {
        if let Some(path) = database {
            tracing::debug!("Database path overridden by {}: {:?}", DATABASE_ENV, path);
            self.database.path = Some(path);
        }
    }
}
