//! Text storage used to read and persist sidecar annotation files.
//!
//! The annotation core never touches the filesystem directly; it goes
//! through [`AnnotationStorage`], so hosts can substitute their own I/O and
//! tests can simulate failures.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::BoxlabelError;

/// Reads and writes whole text files by path.
///
/// Implementations must be shareable across threads because batch export
/// writes several sidecars concurrently.
pub trait AnnotationStorage: Send + Sync {
    /// Returns the file's contents, or `None` if it does not exist.
    fn read_text(&self, path: &Path) -> Result<Option<String>, BoxlabelError>;

    /// Replaces the file's contents with `text`.
    fn write_text(&self, path: &Path, text: &str) -> Result<(), BoxlabelError>;
}

/// Storage backed by the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl AnnotationStorage for FsStorage {
    fn read_text(&self, path: &Path) -> Result<Option<String>, BoxlabelError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BoxlabelError::ReadText {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), BoxlabelError> {
        fs::write(path, text).map_err(|source| BoxlabelError::WriteText {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory storage, for hosts that keep annotations outside the
/// filesystem.
///
/// Paths registered with [`MemoryStorage::fail_writes_to`] reject writes
/// with a permission error.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<PathBuf, String>>,
    read_only: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file, replacing any previous contents.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.lock_files().insert(path.into(), text.into());
    }

    /// Makes every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.lock_read_only().insert(path.into());
    }

    /// Returns a copy of the stored contents of `path`.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.lock_files().get(path).cloned()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.lock_files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every critical section is a single map operation, so a poisoned
    // guard still holds a consistent map.
    fn lock_files(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_read_only(&self) -> std::sync::MutexGuard<'_, BTreeSet<PathBuf>> {
        self.read_only
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AnnotationStorage for MemoryStorage {
    fn read_text(&self, path: &Path) -> Result<Option<String>, BoxlabelError> {
        Ok(self.get(path))
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), BoxlabelError> {
        if self.lock_read_only().contains(path) {
            return Err(BoxlabelError::WriteText {
                path: path.to_path_buf(),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        self.insert(path, text);
        Ok(())
    }
}
