//! # opinia-store
//!
//! Key-value storage for per-respondent artifacts.
//!
//! Every respondent owns up to three artifacts, keyed by their opaque
//! identifier plus a suffix:
//!
//! | Key               | Contents                                  | Write mode        |
//! |-------------------|-------------------------------------------|-------------------|
//! | `<id>.profile`    | JSON: curriculum year, black/white lists  | atomic replace    |
//! | `<id>.log`        | tab-delimited comparison records          | append only       |
//! | `<id>.suggestions`| one suggested course name per line        | atomic replace    |
//!
//! Core logic talks to the [`KvStore`] trait only, so the backend can change
//! without touching it. [`FileStore`] is the production backend;
//! [`MemoryStore`] backs tests.

pub mod error;
pub mod file;
pub mod keys;
pub mod locks;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use keys::{ArtifactKind, artifact_key, validate_key};
pub use locks::KeyLocks;
pub use memory::MemoryStore;

/// Capability set every artifact backend provides.
///
/// Implementations must make `put` all-or-nothing (a failed write leaves the
/// previous value intact) and `append` atomic per call (concurrent appends
/// never interleave within one record).
pub trait KvStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the key is invalid or the read fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace a value atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the key is invalid or the write fails.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Append one record to a value, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the key is invalid or the write fails.
    fn append(&self, key: &str, record: &[u8]) -> Result<(), StoreError>;

    /// Remove a value. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the key is invalid or the removal fails.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All keys ending in `suffix`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be enumerated.
    fn list_by_suffix(&self, suffix: &str) -> Result<Vec<String>, StoreError>;

    /// All keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be enumerated.
    fn list(&self) -> Result<Vec<String>, StoreError> {
        self.list_by_suffix("")
    }
}

impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn append(&self, key: &str, record: &[u8]) -> Result<(), StoreError> {
        (**self).append(key, record)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn list_by_suffix(&self, suffix: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_by_suffix(suffix)
    }
}
