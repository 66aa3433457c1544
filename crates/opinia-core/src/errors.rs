//! Cross-cutting error types for Opinia.
//!
//! Errors that can originate from any crate live here. Domain-specific errors
//! (`StoreError`, `AuthError`, `SurveyError`) are defined in their respective
//! crates and converge into `anyhow` in `opinia-cli`.

use thiserror::Error;

/// Errors that can be raised by any Opinia crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller-supplied value is outside its domain (bad year, empty credential, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A named thing does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
