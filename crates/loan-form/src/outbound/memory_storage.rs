//! In-process draft storage.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{DraftStorage, DraftStorageError, StorageKey};

/// [`DraftStorage`] adapter holding records in a map.
///
/// Useful for embedding the form where nothing should outlive the process,
/// and for tests that need to inspect what was written.
#[derive(Debug, Default)]
pub struct MemoryDraftStorage {
    records: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryDraftStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record exists under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftStorageError::Unavailable`] when the map lock is
    /// poisoned.
    pub fn contains(&self, key: &StorageKey) -> Result<bool, DraftStorageError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<StorageKey, String>>, DraftStorageError> {
        self.records
            .lock()
            .map_err(|_| DraftStorageError::unavailable("draft map lock poisoned"))
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn read(&self, key: &StorageKey) -> Result<Option<String>, DraftStorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &StorageKey, contents: &str) -> Result<(), DraftStorageError> {
        self.lock()?.insert(key.clone(), contents.to_owned());
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<(), DraftStorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn records_are_isolated_by_key() {
        let storage = MemoryDraftStorage::new();
        let primary = StorageKey::default();
        let other = StorageKey::new("otherForm").expect("valid key");

        storage.write(&primary, "a").expect("write");
        assert_eq!(storage.read(&other).expect("read"), None);
        assert!(storage.contains(&primary).expect("lock"));

        storage.remove(&primary).expect("remove");
        storage.remove(&primary).expect("remove twice");
        assert!(!storage.contains(&primary).expect("lock"));
    }
}
