//! Error type shared by every readtime module.
//!
//! Malformed persisted data never reaches this type: it is normalized to
//! defaults where it is read. These variants cover operational failures only.

use thiserror::Error;

/// Errors produced by readtime operations.
#[derive(Error, Debug)]
pub enum ReadtimeError {
    /// Configuration or path resolution failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The SQLite store failed.
    #[error("Database error: {0}")]
    Database(String),

    /// JSON serialization or parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// YAML serialization or parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// User input could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl From<rusqlite::Error> for ReadtimeError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}
