//! Loan form configuration loaded via OrthoConfig.
//!
//! Values layer from defaults, configuration files, `LOAN_FORM_*`
//! environment variables, and command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ports::{StorageKey, StorageKeyValidationError};

const DEFAULT_STORAGE_DIR: &str = ".loan-form";
const DEFAULT_SUBMISSION_DELAY_MS: u64 = 1_500;
const DEFAULT_SUBMISSION_TIMEOUT_MS: u64 = 10_000;

/// Settings for the draft store, the simulated gateway, and logging.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOAN_FORM")]
pub struct LoanFormSettings {
    /// Directory holding draft files.
    pub storage_dir: Option<PathBuf>,
    /// Storage key naming the draft slot.
    pub storage_key: Option<String>,
    /// Simulated backend latency in milliseconds.
    pub submission_delay_ms: Option<u64>,
    /// Upper bound on a submission in milliseconds.
    pub submission_timeout_ms: Option<u64>,
    /// Emit logs as JSON lines.
    #[ortho_config(default = false)]
    pub log_json: bool,
}

impl LoanFormSettings {
    /// Return the configured draft directory, falling back to the default.
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    /// Return the configured storage key, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`StorageKeyValidationError`] when the configured key is not
    /// a valid [`StorageKey`].
    pub fn storage_key(&self) -> Result<StorageKey, StorageKeyValidationError> {
        self.storage_key
            .as_deref()
            .map_or_else(|| Ok(StorageKey::default()), StorageKey::new)
    }

    /// Return the simulated backend latency.
    #[must_use]
    pub fn submission_delay(&self) -> Duration {
        Duration::from_millis(
            self.submission_delay_ms
                .unwrap_or(DEFAULT_SUBMISSION_DELAY_MS),
        )
    }

    /// Return the submission timeout.
    #[must_use]
    pub fn submission_timeout(&self) -> Duration {
        Duration::from_millis(
            self.submission_timeout_ms
                .unwrap_or(DEFAULT_SUBMISSION_TIMEOUT_MS),
        )
    }
}
