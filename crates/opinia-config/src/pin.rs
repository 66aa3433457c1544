//! Email PIN verification settings.

use serde::{Deserialize, Serialize};

fn default_subject() -> String {
    "Opinia verification code".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PinConfig {
    /// Salts for PIN derivation. Must differ from the identity salts.
    #[serde(default)]
    pub salts: Vec<String>,

    /// Outbound mail relay endpoint. Empty means PINs are only logged.
    #[serde(default)]
    pub relay_url: String,

    /// Bearer token for the relay, if it needs one.
    #[serde(default)]
    pub relay_token: String,

    /// Sender address placed on outgoing mail.
    #[serde(default)]
    pub sender: String,

    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            salts: Vec::new(),
            relay_url: String::new(),
            relay_token: String::new(),
            sender: String::new(),
            subject: default_subject(),
        }
    }
}

impl PinConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.salts.iter().any(|salt| !salt.is_empty())
    }

    /// Whether PIN mail goes through a real relay.
    #[must_use]
    pub fn has_relay(&self) -> bool {
        !self.relay_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_relay() {
        let config = PinConfig::default();
        assert!(!config.is_configured());
        assert!(!config.has_relay());
        assert_eq!(config.subject, "Opinia verification code");
    }
}
