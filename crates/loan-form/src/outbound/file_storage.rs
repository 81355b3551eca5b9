//! Draft storage backed by one JSON file per key inside a directory.
//!
//! All access goes through a capability-scoped [`Dir`], so keys cannot
//! escape the configured directory. Writes go to a hidden temporary file that
//! is synced and renamed over the target, so a crash mid-write never leaves a
//! truncated draft behind.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{DraftStorage, DraftStorageError, StorageKey};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-backed [`DraftStorage`] adapter.
#[derive(Debug)]
pub struct FileDraftStorage {
    dir: Dir,
}

impl FileDraftStorage {
    /// Open `path`, creating it and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`DraftStorageError::Unavailable`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Path) -> Result<Self, DraftStorageError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(path, ambient_authority()))
            .map(Self::from_dir)
            .map_err(|err| {
                DraftStorageError::unavailable(format!(
                    "cannot open draft directory {}: {err}",
                    path.display()
                ))
            })
    }

    /// Wrap an already opened directory.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }

    fn file_name(key: &StorageKey) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{key}.json"))
    }
}

impl DraftStorage for FileDraftStorage {
    fn read(&self, key: &StorageKey) -> Result<Option<String>, DraftStorageError> {
        match self.dir.read_to_string(Self::file_name(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DraftStorageError::io(key.as_str(), err.to_string())),
        }
    }

    fn write(&self, key: &StorageKey, contents: &str) -> Result<(), DraftStorageError> {
        write_atomic(&self.dir, &Self::file_name(key), contents)
            .map_err(|err| DraftStorageError::io(key.as_str(), err.to_string()))?;
        debug!(%key, bytes = contents.len(), "wrote draft file");
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<(), DraftStorageError> {
        match self.dir.remove_file(Self::file_name(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DraftStorageError::io(key.as_str(), err.to_string())),
        }
    }
}

fn write_atomic(dir: &Dir, file_name: &Utf8Path, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    if let Err(err) = write_temp_file(dir, &tmp_name, contents) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    if let Err(err) = replace_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    sync_directory(dir);
    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, file_name: &Utf8Path) -> io::Result<()> {
    // Rename does not overwrite on Windows.
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, file_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, file_name: &Utf8Path) -> io::Result<()> {
    dir.rename(tmp_name, dir, file_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; not every platform can sync a directory handle.
    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        debug!(error = %err, "draft directory sync skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    #[rstest]
    fn open_creates_missing_directories(temp_dir: TempDir) {
        let nested = temp_dir.path().join("state").join("drafts");
        let storage = FileDraftStorage::open(&nested).expect("open nested dir");
        let key = StorageKey::default();

        storage.write(&key, "{}").expect("write");
        assert!(nested.join("loanFormData.json").is_file());
    }

    #[rstest]
    fn overwrite_leaves_no_temporary_files(temp_dir: TempDir) {
        let storage = FileDraftStorage::open(temp_dir.path()).expect("open");
        let key = StorageKey::default();

        storage.write(&key, "first").expect("first write");
        storage.write(&key, "second").expect("second write");

        assert_eq!(storage.read(&key).expect("read"), Some("second".to_owned()));
        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .expect("list dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("loanFormData.json")]);
    }
}
