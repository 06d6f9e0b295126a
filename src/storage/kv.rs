//! String-keyed local store.
//!
//! The tracker only needs `get`/`set`/`remove` on string values, which is
//! the whole contract of a browser's local storage. Two backends exist: the
//! `kv` table of the `SQLite` database and an in-process map.

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::ReadtimeError;

/// A string-keyed, string-valued store.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, ReadtimeError>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<(), ReadtimeError>;

    /// Delete a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), ReadtimeError>;
}

/// Store backed by the `kv` table.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wrap an open database.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReadtimeError> {
        self.db
            .connection()
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(|e| ReadtimeError::Database(format!("Failed to read key {key}: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ReadtimeError> {
        self.db
            .connection()
            .execute(
                r"INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                  ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .map_err(|e| ReadtimeError::Database(format!("Failed to write key {key}: {e}")))?;

        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ReadtimeError> {
        self.db
            .connection()
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(|e| ReadtimeError::Database(format!("Failed to delete key {key}: {e}")))?;

        tracing::debug!(key, "removed value");
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReadtimeError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ReadtimeError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ReadtimeError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
