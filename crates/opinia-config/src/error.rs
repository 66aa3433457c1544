//! Errors raised while loading or validating Opinia configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML layer or `OPINIA_*` variable could not be parsed into [`crate::OpiniaConfig`].
    #[error("failed to load opinia configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A section the survey cannot run without, such as `identity`, is empty.
    #[error("configuration section '{section}' is not set up (for example identity.salts is empty)")]
    NotConfigured { section: String },

    /// A field is out of range or inconsistent with `auth.method`.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
