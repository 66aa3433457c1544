//! Pair Sampling Policy.
//!
//! Each round either explores (two greylist names, to learn whether the
//! respondent knows them) or exploits (two whitelist names, to collect a
//! preference). With `G` grey and `W` white names:
//!
//! ```text
//! explore  iff  G > 1  and  U[0,1) < G / (G + W) + floor
//! ```
//!
//! Early on the greylist dominates and most rounds explore; the floor keeps
//! some exploration going as it empties. Explore draws leave the greylist at
//! once. Exploit draws never change the whitelist.

use rand::Rng;
use rand::seq::index;
use serde::Serialize;

use opinia_core::SamplingMode;

use crate::classification::RespondentProfile;
use crate::error::SurveyError;

pub const DEFAULT_EXPLORATION_FLOOR: f64 = 0.1;

/// Two distinct course names drawn for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoursePair {
    pub first: String,
    pub second: String,
    pub mode: SamplingMode,
}

#[derive(Debug, Clone, Copy)]
pub struct PairSampler {
    exploration_floor: f64,
}

impl Default for PairSampler {
    fn default() -> Self {
        Self {
            exploration_floor: DEFAULT_EXPLORATION_FLOOR,
        }
    }
}

impl PairSampler {
    /// # Errors
    ///
    /// Returns `SurveyError::InvalidArgument` if the floor is not within `[0, 1]`.
    pub fn new(exploration_floor: f64) -> Result<Self, SurveyError> {
        if !(0.0..=1.0).contains(&exploration_floor) {
            return Err(SurveyError::invalid(format!(
                "exploration floor must be within [0, 1], got {exploration_floor}"
            )));
        }
        Ok(Self { exploration_floor })
    }

    #[must_use]
    pub const fn exploration_floor(&self) -> f64 {
        self.exploration_floor
    }

    /// Choose a mode by the policy and draw from that pool.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::PoolExhausted` if the chosen pool has fewer than
    /// two names. The profile is unchanged in that case.
    pub fn next_pair<R: Rng + ?Sized>(
        &self,
        profile: &mut RespondentProfile,
        rng: &mut R,
    ) -> Result<CoursePair, SurveyError> {
        let mode = self.choose_mode(profile, rng);
        self.pair_from(profile, mode, rng)
    }

    /// Draw from an explicitly chosen pool.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::PoolExhausted` if that pool has fewer than two names.
    pub fn pair_from<R: Rng + ?Sized>(
        &self,
        profile: &mut RespondentProfile,
        mode: SamplingMode,
        rng: &mut R,
    ) -> Result<CoursePair, SurveyError> {
        match mode {
            SamplingMode::Explore => {
                let available = profile.greylist().len();
                if available < 2 {
                    return Err(SurveyError::PoolExhausted { mode, available });
                }
                let picked = index::sample(rng, available, 2);
                let (first, second) = profile.take_grey_pair(picked.index(0), picked.index(1));
                Ok(CoursePair {
                    first,
                    second,
                    mode,
                })
            }
            SamplingMode::Exploit => {
                let pool: Vec<&String> = profile.whitelist().iter().collect();
                let available = pool.len();
                if available < 2 {
                    return Err(SurveyError::PoolExhausted { mode, available });
                }
                let picked = index::sample(rng, available, 2);
                Ok(CoursePair {
                    first: pool[picked.index(0)].clone(),
                    second: pool[picked.index(1)].clone(),
                    mode,
                })
            }
        }
    }

    /// Draw by the policy, falling back to the other pool when the chosen one
    /// is exhausted. `None` means neither pool can supply a pair: the survey
    /// is over for this respondent.
    pub fn next_pair_or_fallback<R: Rng + ?Sized>(
        &self,
        profile: &mut RespondentProfile,
        rng: &mut R,
    ) -> Option<CoursePair> {
        let mode = self.choose_mode(profile, rng);
        match self.pair_from(profile, mode, rng) {
            Ok(pair) => Some(pair),
            Err(err) => {
                tracing::debug!(%err, "falling back to the {} pool", mode.other());
                self.pair_from(profile, mode.other(), rng).ok()
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn choose_mode<R: Rng + ?Sized>(&self, profile: &RespondentProfile, rng: &mut R) -> SamplingMode {
        let grey = profile.greylist().len();
        let white = profile.whitelist().len();
        if grey > 1 {
            let threshold = grey as f64 / (grey + white) as f64 + self.exploration_floor;
            if rng.gen_range(0.0_f64..1.0) < threshold {
                return SamplingMode::Explore;
            }
        }
        SamplingMode::Exploit
    }
}
