//! Key naming the single storage slot that holds the form draft.
use std::fmt;

use thiserror::Error;

/// Default slot name used by the loan form.
pub const DEFAULT_STORAGE_KEY: &str = "loanFormData";

/// Identifier of the storage slot holding the serialised draft.
///
/// Keys double as file names for the file-backed adapter, so they are limited
/// to ASCII letters, digits, `-` and `_`.
///
/// # Examples
/// ```
/// use loan_form::domain::ports::StorageKey;
///
/// let key = StorageKey::new("loanFormData").expect("valid key");
/// assert_eq!(key.as_str(), "loanFormData");
/// assert!(StorageKey::new("../escape").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Validate and construct a storage key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageKeyValidationError`] when the key is blank, padded
    /// with whitespace, or contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, StorageKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(StorageKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(StorageKeyValidationError::ContainsWhitespace);
        }
        if let Some(character) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(StorageKeyValidationError::InvalidCharacter { character });
        }
        Ok(Self(raw))
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self(DEFAULT_STORAGE_KEY.to_owned())
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`StorageKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("storage key must not be empty")]
    Empty,
    /// Key has leading or trailing whitespace.
    #[error("storage key must not contain surrounding whitespace")]
    ContainsWhitespace,
    /// Key contains a character outside the permitted set.
    #[error("storage key contains unsupported character {character:?}")]
    InvalidCharacter {
        /// First offending character.
        character: char,
    },
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_STORAGE_KEY, StorageKey, StorageKeyValidationError};
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn rejects_blank_keys(#[case] value: &str) {
        let err = StorageKey::new(value).expect_err("blank key rejected");
        assert_eq!(err, StorageKeyValidationError::Empty);
    }

    #[rstest]
    #[case(" loanFormData")]
    #[case("loanFormData\n")]
    fn rejects_padded_keys(#[case] value: &str) {
        let err = StorageKey::new(value).expect_err("padded key rejected");
        assert_eq!(err, StorageKeyValidationError::ContainsWhitespace);
    }

    #[rstest]
    #[case("../drafts", '.')]
    #[case("loan/form", '/')]
    #[case("loan form", ' ')]
    fn rejects_path_like_keys(#[case] value: &str, #[case] character: char) {
        let err = StorageKey::new(value).expect_err("unsafe key rejected");
        assert_eq!(err, StorageKeyValidationError::InvalidCharacter { character });
    }

    #[rstest]
    fn default_key_matches_the_form_slot() {
        assert_eq!(StorageKey::default().as_str(), DEFAULT_STORAGE_KEY);
        assert_eq!(
            StorageKey::new(DEFAULT_STORAGE_KEY).expect("default is valid"),
            StorageKey::default()
        );
    }
}
