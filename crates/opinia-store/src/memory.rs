//! In-memory artifact store for tests and ephemeral runs.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::KvStore;
use crate::error::StoreError;
use crate::keys::validate_key;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn append(&self, key: &str, record: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries()
            .entry(key.to_string())
            .or_default()
            .extend_from_slice(record);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.entries().remove(key).is_some())
    }

    fn list_by_suffix(&self, suffix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries()
            .keys()
            .filter(|key| key.ends_with(suffix))
            .cloned()
            .collect())
    }
}
