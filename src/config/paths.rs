//! Path resolution for readtime configuration and data files.
//!
//! All readtime data is stored in `~/.readtime/` unless `READTIME_HOME` or
//! `--home` points elsewhere:
//! - `config.yaml` - Main configuration file
//! - `readtime.db` - `SQLite` key-value store holding the tracker record
//! - `readtime.log` - Log file written by the live view

use std::path::PathBuf;

use crate::error::ReadtimeError;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "READTIME_HOME";

/// Paths to readtime configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.readtime/`
    pub root: PathBuf,
    /// Config file: `~/.readtime/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.readtime/readtime.db`
    pub database: PathBuf,
    /// Log file: `~/.readtime/readtime.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ReadtimeError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            ReadtimeError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".readtime")))
    }

    /// Use `root` when given, the default location otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is given and the home directory cannot be
    /// determined.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self, ReadtimeError> {
        root.map_or_else(Self::new, |root| Ok(Self::with_root(root)))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("readtime.db"),
            log_file: root.join("readtime.log"),
            root,
        }
    }

    /// Ensure the data root exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), ReadtimeError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                ReadtimeError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
