//! Survey session context.
//!
//! A [`SurveySession`] is opened after authentication for one respondent and
//! owns that respondent's live profile. Rounds follow a strict cycle:
//!
//! ```text
//! next_round ──► (pending) ──► submit ──► commit profile, maybe record
//!                    │
//!                    └──────► abandon ──► nothing written
//! ```
//!
//! Dropping the session ends it. Nothing outlives it except what was
//! committed to the store.

use rand::Rng;
use serde::Serialize;

use opinia_core::{ComparisonRecord, CurriculumYear, Preference, SamplingMode};

use crate::classification::{Availability, RespondentProfile};
use crate::error::SurveyError;
use crate::sampling::CoursePair;
use crate::service::SurveyService;

/// A respondent's answer to the pending round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAnswer {
    pub first: Availability,
    pub second: Availability,
    pub usefulness: Preference,
    pub relatedness: Preference,
}

impl RoundAnswer {
    /// Both courses known; the usual answer to an exploit round.
    #[must_use]
    pub const fn known(usefulness: Preference, relatedness: Preference) -> Self {
        Self {
            first: Availability::Available,
            second: Availability::Available,
            usefulness,
            relatedness,
        }
    }

    #[must_use]
    pub const fn with_availability(mut self, first: Availability, second: Availability) -> Self {
        self.first = first;
        self.second = second;
        self
    }
}

/// What a submitted round changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub pair: CoursePair,
    /// Names moved to the blacklist by this round.
    pub unavailable: Vec<String>,
    /// Whether a comparison record was appended.
    pub recorded: bool,
}

/// Pool sizes and recorded comparisons for one respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub curriculum_year: CurriculumYear,
    pub greylist: usize,
    pub whitelist: usize,
    pub blacklist: usize,
    pub comparisons: usize,
}

pub struct SurveySession<'a> {
    service: &'a SurveyService,
    profile: RespondentProfile,
    pending: Option<CoursePair>,
}

impl<'a> SurveySession<'a> {
    pub(crate) const fn new(service: &'a SurveyService, profile: RespondentProfile) -> Self {
        Self {
            service,
            profile,
            pending: None,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        self.profile.identifier()
    }

    #[must_use]
    pub const fn profile(&self) -> &RespondentProfile {
        &self.profile
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&CoursePair> {
        self.pending.as_ref()
    }

    /// The pair to ask about next, or `None` when the survey is over.
    ///
    /// While a round is pending the same pair is returned again. An explore
    /// pair leaves the in-session greylist as soon as it is drawn.
    pub fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<CoursePair> {
        if let Some(pair) = &self.pending {
            return Some(pair.clone());
        }
        let pair = self
            .service
            .sampler()
            .next_pair_or_fallback(&mut self.profile, rng)?;
        tracing::debug!(mode = %pair.mode, "drew survey round");
        self.pending = Some(pair.clone());
        Some(pair)
    }

    /// Apply the answer to the pending round.
    ///
    /// Unknown courses go to the blacklist and known explore courses to the
    /// whitelist; the profile is committed. A comparison is recorded only
    /// when both courses are known. If the commit or the append fails the
    /// round stays pending and the in-session profile is unchanged, so the
    /// same answer can be submitted again. Resubmitting after a failed append
    /// commits the same classification a second time.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::InvalidState` if no round is pending, or store
    /// errors from the commit or the append.
    pub fn submit(&mut self, answer: RoundAnswer) -> Result<RoundSummary, SurveyError> {
        let pair = self
            .pending
            .clone()
            .ok_or_else(|| SurveyError::InvalidState("no survey round is pending".into()))?;

        let mut updated = self.profile.clone();
        let mut unavailable = Vec::new();
        for (name, availability) in [(&pair.first, answer.first), (&pair.second, answer.second)] {
            if availability == Availability::Unavailable {
                unavailable.push(name.clone());
            } else if pair.mode == SamplingMode::Exploit {
                continue;
            }
            updated.mark(name, availability);
        }

        let record = if unavailable.is_empty() {
            Some(ComparisonRecord::new(
                pair.first.as_str(),
                pair.second.as_str(),
                answer.usefulness,
                answer.relatedness,
            )?)
        } else {
            None
        };

        self.service.classification().commit(&updated)?;
        if let Some(record) = &record {
            if let Err(err) = self.service.recorder().record(self.identifier(), record) {
                tracing::warn!(%err, "comparison not recorded; round stays pending");
                return Err(err);
            }
        } else {
            tracing::debug!(
                unavailable = unavailable.len(),
                "round had unknown courses; no comparison recorded"
            );
        }

        self.profile = updated;
        self.pending = None;
        Ok(RoundSummary {
            pair,
            unavailable,
            recorded: record.is_some(),
        })
    }

    /// Drop the pending round without writing anything. Explore names stay
    /// out of this session's greylist and return on the next load.
    pub fn abandon(&mut self) -> Option<CoursePair> {
        let dropped = self.pending.take();
        if dropped.is_some() {
            tracing::debug!("abandoned pending survey round");
        }
        dropped
    }

    /// Whitelist enrolled courses that are still undetermined, committing if
    /// anything moved. Returns how many moved.
    ///
    /// # Errors
    ///
    /// Returns store errors from the commit.
    pub fn seed_known<I, S>(&mut self, known: I) -> Result<usize, SurveyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut updated = self.profile.clone();
        let moved = updated.seed_known(known);
        if moved > 0 {
            self.service.classification().commit(&updated)?;
            self.profile = updated;
            tracing::info!(moved, "seeded whitelist from enrolled courses");
        }
        Ok(moved)
    }

    /// # Errors
    ///
    /// See [`SuggestionList::add`](crate::SuggestionList::add).
    pub fn suggest(&self, name: &str) -> Result<bool, SurveyError> {
        self.service.suggestions().add(self.identifier(), name)
    }

    /// # Errors
    ///
    /// See [`SuggestionList::remove`](crate::SuggestionList::remove).
    pub fn withdraw_suggestion(&self, name: &str) -> Result<(), SurveyError> {
        self.service.suggestions().remove(self.identifier(), name)
    }

    /// # Errors
    ///
    /// See [`SuggestionList::list`](crate::SuggestionList::list).
    pub fn suggestions(&self) -> Result<Vec<String>, SurveyError> {
        self.service.suggestions().list(self.identifier())
    }

    /// # Errors
    ///
    /// Returns an error if the comparison log cannot be read.
    pub fn progress(&self) -> Result<Progress, SurveyError> {
        Ok(Progress {
            curriculum_year: self.profile.curriculum_year(),
            greylist: self.profile.greylist().len(),
            whitelist: self.profile.whitelist().len(),
            blacklist: self.profile.blacklist().len(),
            comparisons: self.service.recorder().count(self.identifier())?,
        })
    }
}

impl std::fmt::Debug for SurveySession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveySession")
            .field("profile", &self.profile)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
