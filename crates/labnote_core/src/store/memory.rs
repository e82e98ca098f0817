//! In-memory key-value store for tests and throwaway sessions.

use super::{checked_key, KeyValueStore, StoreResult};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    values: BTreeMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = checked_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let key = checked_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<bool> {
        let key = checked_key(key)?;
        Ok(self.values.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStore;
    use crate::store::{KeyValueStore, StoreError};

    #[test]
    fn set_get_remove_round_trip() {
        let mut store = MemoryKeyValueStore::new();
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn blank_key_is_rejected() {
        let mut store = MemoryKeyValueStore::new();
        assert!(matches!(store.set("  ", "v"), Err(StoreError::EmptyKey)));
    }
}
