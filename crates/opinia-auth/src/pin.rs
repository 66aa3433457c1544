//! Email + emailed PIN scheme.
//!
//! The PIN is never stored. It is recomputed from the normalized address and
//! the PIN salt set whenever it is sent or checked:
//!
//! ```text
//! digest = resolve_digest(lowercase(address), pin_salts)
//! pin    = format("{:06}", u64::from_be_bytes(digest[..8]) % 1_000_000)
//! ```
//!
//! A given address therefore always receives the same PIN until the salts
//! are rotated.

use std::sync::Arc;

use opinia_core::identity::resolve_digest;

use crate::VerifiedCredential;
use crate::error::AuthError;
use crate::mailer::{MailMessage, Mailer};

const PIN_MODULUS: u64 = 1_000_000;

/// Trim and lowercase an address, rejecting anything without a local part
/// and a domain.
///
/// # Errors
///
/// Returns `AuthError::InvalidArgument` for malformed addresses.
pub fn normalize_address(address: &str) -> Result<String, AuthError> {
    let address = address.trim().to_lowercase();
    let valid = match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !address.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(address)
    } else {
        Err(AuthError::InvalidArgument(format!(
            "'{address}' is not an email address"
        )))
    }
}

/// The six-digit PIN for `address`.
///
/// # Errors
///
/// Returns `AuthError::InvalidArgument` for a malformed address or an empty
/// salt set.
pub fn derive_pin<S: AsRef<str>>(address: &str, salts: &[S]) -> Result<String, AuthError> {
    let address = normalize_address(address)?;
    let digest = resolve_digest(&address, salts)
        .ok_or_else(|| AuthError::InvalidArgument("PIN derivation needs at least one salt".into()))?;
    let mut head = [0_u8; 8];
    head.copy_from_slice(&digest[..8]);
    Ok(format!("{:06}", u64::from_be_bytes(head) % PIN_MODULUS))
}

pub struct PinLogin {
    salts: Vec<String>,
    mailer: Arc<dyn Mailer>,
    subject: String,
}

impl PinLogin {
    /// # Errors
    ///
    /// Returns `AuthError::InvalidArgument` if `salts` is empty.
    pub fn new(
        salts: Vec<String>,
        mailer: Arc<dyn Mailer>,
        subject: impl Into<String>,
    ) -> Result<Self, AuthError> {
        if salts.is_empty() {
            return Err(AuthError::InvalidArgument(
                "PIN login needs at least one salt".into(),
            ));
        }
        Ok(Self {
            salts,
            mailer,
            subject: subject.into(),
        })
    }

    /// Mail the PIN for `address`. Returns the normalized address it went to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidArgument` for a malformed address or the
    /// mailer's error if delivery fails.
    pub async fn send(&self, address: &str) -> Result<String, AuthError> {
        let to = normalize_address(address)?;
        let pin = derive_pin(&to, &self.salts)?;
        let message = MailMessage {
            to: to.clone(),
            subject: self.subject.clone(),
            body: format!("Your verification code is {pin}."),
        };
        self.mailer.send(&message).await?;
        tracing::info!("verification code sent");
        Ok(to)
    }

    /// Check a submitted PIN.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PinMismatch` if the PIN is wrong and
    /// `AuthError::InvalidArgument` for a malformed address.
    pub fn verify(&self, address: &str, pin: &str) -> Result<VerifiedCredential, AuthError> {
        let subject = normalize_address(address)?;
        let expected = derive_pin(&subject, &self.salts)?;
        if pin.trim() != expected {
            tracing::info!("verification code mismatch");
            return Err(AuthError::PinMismatch);
        }
        Ok(VerifiedCredential {
            subject,
            token: None,
        })
    }
}

impl std::fmt::Debug for PinLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinLogin")
            .field("salts", &self.salts.len())
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}
