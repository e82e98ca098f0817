//! Entry collection repository over the key-value capability.
//!
//! # Responsibility
//! - Persist the whole entry collection as one JSON document.
//! - Reject persisted state that breaks entry invariants instead of masking it.
//!
//! # Invariants
//! - The collection is written wholesale; there are no partial updates.
//! - Loaded collections have unique, valid entries.

use crate::model::entry::{Entry, EntryId, EntryValidationError};
use crate::store::{KeyValueStore, StoreError};
use log::{info, warn};
use std::collections::HashSet;
use thiserror::Error;

/// Storage key holding the serialized entry collection.
pub const ENTRIES_STORE_KEY: &str = "labnote.entries";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode or decode entries: {0}")]
    Codec(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] EntryValidationError),
    #[error("entry not found: {0}")]
    NotFound(EntryId),
    #[error("invalid persisted entry data: {0}")]
    InvalidData(String),
}

/// Repository interface for the entry collection.
pub trait EntryRepository {
    /// Loads the stored collection; `None` when nothing was ever saved.
    fn load_entries(&self) -> RepoResult<Option<Vec<Entry>>>;
    /// Replaces the stored collection.
    fn save_entries(&mut self, entries: &[Entry]) -> RepoResult<()>;
}

/// Entry repository storing JSON under [`ENTRIES_STORE_KEY`].
pub struct KvEntryRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvEntryRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the wrapped store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> EntryRepository for KvEntryRepository<S> {
    fn load_entries(&self) -> RepoResult<Option<Vec<Entry>>> {
        let Some(raw) = self.store.get(ENTRIES_STORE_KEY)? else {
            return Ok(None);
        };

        let entries: Vec<Entry> = serde_json::from_str(&raw).map_err(|err| {
            warn!("event=entries_load module=repo status=error error_code=decode_failed");
            RepoError::Codec(err)
        })?;
        ensure_collection_valid(&entries)?;
        info!(
            "event=entries_load module=repo status=ok count={}",
            entries.len()
        );
        Ok(Some(entries))
    }

    fn save_entries(&mut self, entries: &[Entry]) -> RepoResult<()> {
        ensure_collection_valid(entries)?;
        let raw = serde_json::to_string(entries)?;
        self.store.set(ENTRIES_STORE_KEY, &raw)?;
        info!(
            "event=entries_save module=repo status=ok count={} bytes={}",
            entries.len(),
            raw.len()
        );
        Ok(())
    }
}

fn ensure_collection_valid(entries: &[Entry]) -> RepoResult<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        entry.validate()?;
        if !seen.insert(entry.id.as_str()) {
            return Err(RepoError::InvalidData(format!(
                "duplicate entry id `{}`",
                entry.id
            )));
        }
    }
    Ok(())
}
