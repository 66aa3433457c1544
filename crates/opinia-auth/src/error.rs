use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad credential, unknown account, or a non-success upstream answer.
    /// The message is safe to show to the respondent.
    #[error("authentication failed: {0}")]
    Rejected(String),

    #[error("verification code does not match")]
    PinMismatch,

    #[error("invalid input: {0}")]
    InvalidArgument(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected upstream response: {0}")]
    Upstream(String),

    #[error("mail delivery failed: {0}")]
    Mail(String),
}

impl AuthError {
    /// Whether this is a rejected attempt (as opposed to an infrastructure failure).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::PinMismatch)
    }
}

impl From<opinia_core::CoreError> for AuthError {
    fn from(error: opinia_core::CoreError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}
