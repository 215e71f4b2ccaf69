//! Key-value persistence for the theme preference.
//!
//! ERROR HANDLING
//! ==============
//! Every store returns `StorageError` instead of panicking. The controller
//! logs those errors and keeps its in-memory theme authoritative.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::HashMap;

/// Errors produced by a preference store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store cannot be reached at all (no window, storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    /// The store exists but its contents cannot be decoded.
    #[error("storage contents are corrupt: {0}")]
    Corrupt(String),
}

/// A string key-value store holding the persisted preference.
pub trait PreferenceStore {
    /// Read `key`. `Ok(None)` means nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile in-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{PreferenceStore, StorageError};

    /// JSON object on disk, one string value per key.
    ///
    /// A missing file reads as empty. Writes rewrite the whole file.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
            let raw = match std::fs::read_to_string(&self.path) {
                Ok(raw) => raw,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
                Err(e) => return Err(StorageError::Read(format!("{}: {e}", self.path.display()))),
            };
            if raw.trim().is_empty() {
                return Ok(BTreeMap::new());
            }
            serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display())))
        }
    }

    impl PreferenceStore for FileStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.read_map()?.remove(key))
        }

        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut map = self.read_map()?;
            map.insert(key.to_owned(), value.to_owned());

            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Write(format!("{}: {e}", parent.display())))?;
            }
            let raw = serde_json::to_string_pretty(&map).map_err(|e| StorageError::Write(e.to_string()))?;
            std::fs::write(&self.path, raw).map_err(|e| StorageError::Write(format!("{}: {e}", self.path.display())))
        }
    }
}
