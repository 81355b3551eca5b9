//! Draft persistence: the versioned record codec and the store that reads and
//! writes it through [`DraftStorage`].
//!
//! A record is a JSON envelope carrying a format version, the time it was
//! written, and the full set of form values. Anything that does not decode
//! cleanly is corrupt and is discarded as a whole.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::FormValues;
use super::ports::{DraftStorage, DraftStorageError, StorageKey};

/// Format version written into every draft record.
pub const DRAFT_FORMAT_VERSION: u32 = 1;

/// A decoded draft record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRecord {
    /// When the record was written.
    pub saved_at: DateTime<Utc>,
    /// The complete form snapshot.
    pub values: FormValues,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Envelope {
    version: u32,
    saved_at: DateTime<Utc>,
    values: FormValues,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

/// Reasons a stored record could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftDecodeError {
    /// The record is not a well-formed draft envelope.
    #[error("draft record is malformed: {message}")]
    Malformed {
        /// Parser diagnostic.
        message: String,
    },
    /// The record was written by an incompatible format version.
    #[error("draft record version {actual} is not supported (expected {expected})")]
    UnsupportedVersion {
        /// Version this build writes.
        expected: u32,
        /// Version found in the record.
        actual: u32,
    },
}

impl DraftDecodeError {
    fn malformed(error: &serde_json::Error) -> Self {
        Self::Malformed {
            message: error.to_string(),
        }
    }
}

impl DraftRecord {
    /// Serialise the record as a versioned JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error; form values always serialise, so this
    /// only fails if `serde_json` itself does.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Envelope {
            version: DRAFT_FORMAT_VERSION,
            saved_at: self.saved_at,
            values: self.values.clone(),
        })
    }

    /// Decode a stored record.
    ///
    /// The version is checked before the body so that a record from another
    /// format is reported as such rather than as malformed.
    ///
    /// # Errors
    ///
    /// Returns [`DraftDecodeError`] for invalid JSON, a version mismatch, or
    /// any missing or unknown field.
    pub fn decode(raw: &str) -> Result<Self, DraftDecodeError> {
        let header: VersionHeader =
            serde_json::from_str(raw).map_err(|e| DraftDecodeError::malformed(&e))?;
        if header.version != DRAFT_FORMAT_VERSION {
            return Err(DraftDecodeError::UnsupportedVersion {
                expected: DRAFT_FORMAT_VERSION,
                actual: header.version,
            });
        }
        let envelope: Envelope =
            serde_json::from_str(raw).map_err(|e| DraftDecodeError::malformed(&e))?;
        Ok(Self {
            saved_at: envelope.saved_at,
            values: envelope.values,
        })
    }
}

/// Errors surfaced by the fallible [`DraftStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftStoreError {
    /// The storage adapter failed.
    #[error(transparent)]
    Storage(#[from] DraftStorageError),
    /// The stored record could not be decoded.
    #[error(transparent)]
    Corrupt(#[from] DraftDecodeError),
    /// The snapshot could not be serialised.
    #[error("failed to encode draft: {message}")]
    Encode {
        /// Serialiser diagnostic.
        message: String,
    },
}

/// Reads, writes, and clears the form draft under one storage key.
///
/// The `try_*` operations report every failure. Their plain counterparts
/// absorb failures into log events so that a broken or corrupt draft never
/// blocks the form.
pub struct DraftStore<S> {
    storage: Arc<S>,
    key: StorageKey,
    clock: Arc<dyn Clock>,
}

impl<S> DraftStore<S>
where
    S: DraftStorage,
{
    /// Create a store writing to `key` and stamping records with `clock`.
    #[must_use]
    pub const fn new(storage: Arc<S>, key: StorageKey, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            key,
            clock,
        }
    }

    /// Key of the slot this store manages.
    #[must_use]
    pub const fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Read and decode the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DraftStoreError::Storage`] when the adapter fails and
    /// [`DraftStoreError::Corrupt`] when the record does not decode. Corrupt
    /// records are left in place.
    pub fn try_load(&self) -> Result<Option<DraftRecord>, DraftStoreError> {
        let Some(raw) = self.storage.read(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(DraftRecord::decode(&raw)?))
    }

    /// Load the stored form values.
    ///
    /// Returns `None` when nothing is stored, when the adapter fails, or
    /// when the record is corrupt. A corrupt record is deleted.
    pub fn load(&self) -> Option<FormValues> {
        match self.try_load() {
            Ok(Some(record)) => {
                debug!(key = %self.key, saved_at = %record.saved_at, "restored form draft");
                Some(record.values)
            }
            Ok(None) => {
                debug!(key = %self.key, "no form draft stored");
                None
            }
            Err(DraftStoreError::Corrupt(error)) => {
                warn!(key = %self.key, error = %error, "discarding corrupt form draft");
                self.clear();
                None
            }
            Err(error) => {
                warn!(key = %self.key, error = %error, "failed to read form draft");
                None
            }
        }
    }

    /// Write the complete snapshot, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`DraftStoreError`] when encoding or the adapter fails.
    pub fn try_save(&self, values: &FormValues) -> Result<(), DraftStoreError> {
        let record = DraftRecord {
            saved_at: self.clock.utc(),
            values: values.clone(),
        };
        let encoded = record.encode().map_err(|e| DraftStoreError::Encode {
            message: e.to_string(),
        })?;
        self.storage.write(&self.key, &encoded)?;
        Ok(())
    }

    /// Write the complete snapshot, logging any failure.
    pub fn save(&self, values: &FormValues) {
        if let Err(error) = self.try_save(values) {
            warn!(key = %self.key, error = %error, "failed to save form draft");
        }
    }

    /// Delete the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DraftStoreError::Storage`] when the adapter fails.
    pub fn try_clear(&self) -> Result<(), DraftStoreError> {
        self.storage.remove(&self.key)?;
        Ok(())
    }

    /// Delete the stored record, logging any failure.
    pub fn clear(&self) {
        match self.try_clear() {
            Ok(()) => debug!(key = %self.key, "cleared form draft"),
            Err(error) => warn!(key = %self.key, error = %error, "failed to clear form draft"),
        }
    }
}
