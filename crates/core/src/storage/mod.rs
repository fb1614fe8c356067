//! Durable key-value storage for small serialized documents.
//!
//! The watchlist is persisted as a single JSON document under one key, so a
//! plain string-to-string store is all that is needed.

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend failure (SQLite, I/O).
    #[error("Database error: {0}")]
    Database(String),

    /// The store has been made unavailable (used by tests to simulate a
    /// failing disk).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Trait for key-value storage backends.
///
/// Implementations must be read-after-write consistent within a process.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
