//! Command implementations for readtime.
//!
//! This module contains the implementation of all CLI commands.

mod completions;
mod config;
mod data;
mod report;
mod tracker;

pub use completions::completions;
pub use config::config;
pub use data::{export, import, reset};
pub use report::report;
pub use tracker::{break_command, history, start, status, stop};

use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::core::SystemClock;
use crate::error::ReadtimeError;
use crate::features::tracker::Tracker;
use crate::storage::{Database, SqliteStore};

/// Everything a command needs besides its arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved data paths.
    pub paths: Paths,
    /// Loaded configuration.
    pub config: Config,
    /// Output format for this invocation.
    pub format: OutputFormat,
}

/// Tracker over the on-disk store and the system clock.
pub type DiskTracker = Tracker<SqliteStore, SystemClock>;

impl Context {
    /// Open the database and load the tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or read.
    pub fn open_tracker(&self) -> Result<DiskTracker, ReadtimeError> {
        let db = Database::open(&self.paths)?;
        Tracker::load(SqliteStore::new(db), SystemClock, self.config.tracker.rollover)
    }
}
