//! Survey error types.

use opinia_core::{CoreError, SamplingMode};
use opinia_store::StoreError;
use thiserror::Error;

/// Errors from survey operations.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// A caller-supplied value is not acceptable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The pool for the requested mode has fewer than two names.
    #[error("{mode} pool exhausted: {available} course(s) available, 2 needed")]
    PoolExhausted { mode: SamplingMode, available: usize },

    /// A named thing does not exist.
    #[error("{what} not found: {name}")]
    NotFound { what: String, name: String },

    /// A persisted artifact exists but cannot be understood.
    #[error("artifact '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    /// The session is not in a state that allows the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SurveyError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn corrupt(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
