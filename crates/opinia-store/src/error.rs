//! Store error types.

use thiserror::Error;

/// Errors from artifact storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key is not a plain artifact name.
    #[error("invalid artifact key {0:?}")]
    InvalidKey(String),

    /// The backend failed to read or write an artifact.
    #[error("I/O failure on artifact '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }
}
