//! Directory-backed artifact store.
//!
//! One file per key under a root directory. Replacements go through a temp
//! file in the same directory followed by a rename, so a failed write never
//! leaves a truncated profile or suggestion list behind. Appends open the
//! file in append mode and hand the whole record to a single `write_all`
//! while holding the key's lock.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::KvStore;
use crate::error::StoreError;
use crate::keys::validate_key;
use crate::locks::KeyLocks;

#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    locks: KeyLocks,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root.display().to_string(), e))?;
        tracing::debug!(root = %root.display(), "opened file store");
        Ok(Self {
            root,
            locks: KeyLocks::new(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn write_atomic(&self, key: &str, path: &Path, value: &[u8]) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| StoreError::io(key, e))?;
        tmp.write_all(value).map_err(|e| StoreError::io(key, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(key, e))?;
        tmp.persist(path).map_err(|e| StoreError::io(key, e.error))?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        self.locks
            .with_lock(key, || self.write_atomic(key, &path, value))?;
        tracing::debug!(key, bytes = value.len(), "replaced artifact");
        Ok(())
    }

    fn append(&self, key: &str, record: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        self.locks.with_lock(key, || {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| StoreError::io(key, e))?;
            file.write_all(record).map_err(|e| StoreError::io(key, e))?;
            file.flush().map_err(|e| StoreError::io(key, e))
        })?;
        tracing::debug!(key, bytes = record.len(), "appended artifact record");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        self.locks.with_lock(key, || match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(key, e)),
        })
    }

    fn list_by_suffix(&self, suffix: &str) -> Result<Vec<String>, StoreError> {
        let root = self.root.display().to_string();
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| StoreError::io(&root, e))? {
            let entry = entry.map_err(|e| StoreError::io(&root, e))?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            // Temp files from in-flight replacements start with a dot.
            if validate_key(&name).is_ok() && name.ends_with(suffix) {
                keys.push(name);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
