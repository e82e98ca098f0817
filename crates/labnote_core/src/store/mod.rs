//! Key-value storage capability.
//!
//! # Responsibility
//! - Define the injected string key-value contract used for the entry
//!   collection and the summary credential.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Keys are non-empty after trimming.
//! - `get` on an absent key is `Ok(None)`, never an error.

use crate::db::DbError;
use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("storage key must not be empty")]
    EmptyKey,
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value capability, the only persistence surface of the app.
pub trait KeyValueStore {
    /// Reads one value.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Inserts or replaces one value.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes one value, returning whether it existed.
    fn remove(&mut self, key: &str) -> StoreResult<bool>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }
}

fn checked_key(key: &str) -> StoreResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        Err(StoreError::EmptyKey)
    } else {
        Ok(trimmed)
    }
}
