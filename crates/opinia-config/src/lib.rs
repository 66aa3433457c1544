//! # opinia-config
//!
//! Layered configuration loading for Opinia using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`OPINIA_*` prefix, `__` as separator)
//! 2. Project-level `.opinia/config.toml`
//! 3. User-level `~/.config/opinia/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `OPINIA_STORAGE__DATA_DIR` -> `storage.data_dir`,
//! `OPINIA_AUTH__LOGIN_URL` -> `auth.login_url`, etc. List values such as
//! salts are written as TOML arrays: `OPINIA_IDENTITY__SALTS='["a","b"]'`.
//!
//! # Usage
//!
//! ```no_run
//! use opinia_config::OpiniaConfig;
//!
//! let config = OpiniaConfig::load().expect("config");
//! config.validate().expect("usable config");
//! println!("data dir: {}", config.storage.data_dir.display());
//! ```

mod auth;
mod error;
mod identity;
mod pin;
mod storage;
mod survey;

pub use auth::{AuthConfig, AuthMethod};
pub use error::ConfigError;
pub use identity::IdentityConfig;
pub use pin::PinConfig;
pub use storage::{CatalogConfig, StorageConfig};
pub use survey::SurveyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpiniaConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub pin: PinConfig,
    #[serde(default)]
    pub survey: SurveyConfig,
}

impl OpiniaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// `.env` files are not read here; the binary loads them before calling this.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".opinia/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("OPINIA_").split("__"))
    }

    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` or `ConfigError::NotConfigured` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.identity.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "identity".into(),
            });
        }
        self.survey.validate()?;
        if self.auth.method == AuthMethod::EmailPin && !self.pin.is_configured() {
            return Err(ConfigError::InvalidValue {
                field: "pin.salts".into(),
                reason: "auth.method = \"email_pin\" requires at least one PIN salt".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("opinia").join("config.toml"))
    }
}
