//! Flat string-keyed persistence underneath the job store.
//!
//! The job store never talks to a database directly. It is handed a
//! [`KeyValueStore`] and models its simulated file tree (`users.json`,
//! `jobs/index.json`, `jobs/<id>/metadata.json`, ...) as keys of that map.
//!
//! Two implementations are provided:
//! - [`SqliteStore`]: a single `kv` table in a SQLite file, used by the server.
//! - `MemoryStore`: an ordered in-memory map, compiled for tests only.
//!
//! Each call is an atomic single-key operation. There is no multi-key transaction.

#[cfg(test)]
mod memory;
mod sqlite;

#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Failure of the underlying key-value substrate.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Inserts or replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}
