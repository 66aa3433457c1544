//! Salts for respondent identifier derivation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Server-side secret salts, applied in sorted order.
    #[serde(default)]
    pub salts: Vec<String>,
}

impl IdentityConfig {
    /// At least one non-empty salt is required before credentials can be resolved.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.salts.iter().any(|salt| !salt.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_salts_do_not_count() {
        let config = IdentityConfig {
            salts: vec![String::new()],
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn configured_with_one_salt() {
        let config = IdentityConfig {
            salts: vec!["pepper".into()],
        };
        assert!(config.is_configured());
    }
}
