//! # opinia-auth
//!
//! Respondent verification for Opinia.
//!
//! Two schemes exist; a deployment enables exactly one of them:
//! - **Password**: student ID + password checked against the upstream login
//!   API ([`PasswordLogin`]). A successful login also yields a bearer token
//!   that can list the respondent's enrolled courses.
//! - **Email PIN**: a six-digit PIN derived from the address and a secret
//!   salt set is mailed out and compared on submission ([`PinLogin`]).
//!
//! Both produce a [`VerifiedCredential`]. Turning that into an anonymous
//! respondent identifier is `opinia_core::IdentityResolver`'s job; nothing in
//! this crate stores credentials.

pub mod allowlist;
pub mod error;
pub mod mailer;
pub mod password;
pub mod pin;
pub mod upstream;

pub use allowlist::Allowlist;
pub use error::AuthError;
pub use mailer::{LogMailer, MailMessage, Mailer, RelayMailer};
pub use password::PasswordLogin;
pub use pin::{PinLogin, derive_pin, normalize_address};
pub use upstream::UpstreamClient;

/// A credential that passed verification.
#[derive(Clone)]
pub struct VerifiedCredential {
    /// The student ID or normalized email address that was verified.
    pub subject: String,
    /// Upstream bearer token (password scheme only).
    pub token: Option<String>,
}

impl std::fmt::Debug for VerifiedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifiedCredential")
            .field("subject", &self.subject)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
