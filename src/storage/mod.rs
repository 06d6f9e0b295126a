//! Storage layer for readtime.
//!
//! `SQLite` persistence behind a plain key-value interface.

mod database;
mod kv;
mod migrations;

pub use database::Database;
#[cfg(test)]
pub use kv::MockKeyValueStore;
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
