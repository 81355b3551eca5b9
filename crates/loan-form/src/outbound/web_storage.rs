//! Draft storage backed by the browser's `localStorage`.
//!
//! Browser handles are not `Send`, so the adapter keeps no handle and looks
//! up `window.localStorage` on every call.

use web_sys::Storage;

use crate::domain::ports::{DraftStorage, DraftStorageError, StorageKey};

/// `localStorage`-backed [`DraftStorage`] adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebDraftStorage;

impl WebDraftStorage {
    fn local_storage() -> Result<Storage, DraftStorageError> {
        let window = web_sys::window()
            .ok_or_else(|| DraftStorageError::unavailable("no browser window"))?;
        window
            .local_storage()
            .map_err(|err| DraftStorageError::unavailable(format!("{err:?}")))?
            .ok_or_else(|| DraftStorageError::unavailable("localStorage is disabled"))
    }
}

impl DraftStorage for WebDraftStorage {
    fn read(&self, key: &StorageKey) -> Result<Option<String>, DraftStorageError> {
        Self::local_storage()?
            .get_item(key.as_str())
            .map_err(|err| DraftStorageError::io(key.as_str(), format!("{err:?}")))
    }

    fn write(&self, key: &StorageKey, contents: &str) -> Result<(), DraftStorageError> {
        Self::local_storage()?
            .set_item(key.as_str(), contents)
            .map_err(|err| DraftStorageError::io(key.as_str(), format!("{err:?}")))
    }

    fn remove(&self, key: &StorageKey) -> Result<(), DraftStorageError> {
        Self::local_storage()?
            .remove_item(key.as_str())
            .map_err(|err| DraftStorageError::io(key.as_str(), format!("{err:?}")))
    }
}
