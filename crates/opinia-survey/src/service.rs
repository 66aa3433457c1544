//! `SurveyService` bundles the survey components over one store and catalog.
//!
//! It is shared by every respondent; per-respondent state lives only in the
//! [`SurveySession`]s it opens.

use std::sync::Arc;

use opinia_core::{CourseCatalog, CurriculumYear};
use opinia_store::{KeyLocks, KvStore};

use crate::admin::ArtifactAdmin;
use crate::classification::ClassificationStore;
use crate::error::SurveyError;
use crate::recorder::ComparisonRecorder;
use crate::sampling::PairSampler;
use crate::session::SurveySession;
use crate::suggestions::SuggestionList;

#[derive(Debug)]
pub struct SurveyService {
    classification: ClassificationStore,
    recorder: ComparisonRecorder,
    suggestions: SuggestionList,
    admin: ArtifactAdmin,
    sampler: PairSampler,
}

impl SurveyService {
    pub fn new(store: Arc<dyn KvStore>, catalog: Arc<CourseCatalog>, sampler: PairSampler) -> Self {
        let locks = Arc::new(KeyLocks::new());
        Self {
            classification: ClassificationStore::new(
                Arc::clone(&store),
                catalog,
                Arc::clone(&locks),
            ),
            recorder: ComparisonRecorder::new(Arc::clone(&store)),
            suggestions: SuggestionList::new(Arc::clone(&store), locks),
            admin: ArtifactAdmin::new(store),
            sampler,
        }
    }

    /// Open a session for `identifier`.
    ///
    /// A first-time respondent gets a fresh profile for `year`, persisted
    /// right away. A returning respondent keeps their stored year.
    ///
    /// # Errors
    ///
    /// Returns store, catalog or corrupt-profile errors.
    pub fn open_session(
        &self,
        identifier: &str,
        year: CurriculumYear,
    ) -> Result<SurveySession<'_>, SurveyError> {
        let profile = self.classification.initialize(identifier, year)?;
        self.classification.commit(&profile)?;
        tracing::debug!(year = %profile.curriculum_year(), "opened survey session");
        Ok(SurveySession::new(self, profile))
    }

    /// The year a returning respondent chose, or `None` for a new one.
    ///
    /// # Errors
    ///
    /// See [`ClassificationStore::load`].
    pub fn stored_year(&self, identifier: &str) -> Result<Option<CurriculumYear>, SurveyError> {
        Ok(self
            .classification
            .load(identifier)?
            .map(|profile| profile.curriculum_year()))
    }

    #[must_use]
    pub const fn classification(&self) -> &ClassificationStore {
        &self.classification
    }

    #[must_use]
    pub const fn recorder(&self) -> &ComparisonRecorder {
        &self.recorder
    }

    #[must_use]
    pub const fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    #[must_use]
    pub const fn admin(&self) -> &ArtifactAdmin {
        &self.admin
    }

    #[must_use]
    pub const fn sampler(&self) -> &PairSampler {
        &self.sampler
    }
}
