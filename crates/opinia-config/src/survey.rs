//! Sampling policy tuning.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_exploration_floor() -> f64 {
    0.1
}

const fn default_seed_from_enrolled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SurveyConfig {
    /// Added to `G / (G + W)` when deciding whether to explore.
    #[serde(default = "default_exploration_floor")]
    pub exploration_floor: f64,

    /// Move enrolled courses from the greylist to the whitelist at login.
    #[serde(default = "default_seed_from_enrolled")]
    pub seed_from_enrolled: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            exploration_floor: default_exploration_floor(),
            seed_from_enrolled: default_seed_from_enrolled(),
        }
    }
}

impl SurveyConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the floor is not within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.exploration_floor) {
            return Err(ConfigError::InvalidValue {
                field: "survey.exploration_floor".into(),
                reason: format!("must be within [0, 1], got {}", self.exploration_floor),
            });
        }
        Ok(())
    }
}
