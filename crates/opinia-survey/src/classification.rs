//! Course Classification Store.
//!
//! Each respondent's courses fall into three disjoint groups:
//!
//! - **blacklist**: the respondent does not know the course
//! - **whitelist**: the respondent knows it; eligible for comparison
//! - **greylist**: not yet asked
//!
//! Only the year and the black/white lists are persisted. The greylist is
//! re-derived from the catalog on every load and then kept as an in-session
//! working copy that exploration rounds consume.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opinia_core::{CourseCatalog, CurriculumYear};
use opinia_store::{ArtifactKind, KeyLocks, KvStore, artifact_key};

use crate::error::SurveyError;

/// A respondent's answer to "do you know this course?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    #[must_use]
    pub const fn from_known(known: bool) -> Self {
        if known {
            Self::Available
        } else {
            Self::Unavailable
        }
    }
}

/// Live classification state for one respondent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespondentProfile {
    identifier: String,
    curriculum_year: CurriculumYear,
    blacklist: BTreeSet<String>,
    whitelist: BTreeSet<String>,
    greylist: Vec<String>,
}

impl RespondentProfile {
    /// A profile nobody has answered anything for: every catalog name is grey.
    #[must_use]
    pub fn fresh(identifier: impl Into<String>, year: CurriculumYear, names: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            curriculum_year: year,
            blacklist: BTreeSet::new(),
            whitelist: BTreeSet::new(),
            greylist: names,
        }
    }

    fn from_document(
        identifier: &str,
        document: ProfileDocument,
        names: Vec<String>,
    ) -> Result<Self, String> {
        let blacklist: BTreeSet<String> = document.blacklist.into_iter().collect();
        let whitelist: BTreeSet<String> = document.whitelist.into_iter().collect();
        if let Some(both) = blacklist.intersection(&whitelist).next() {
            return Err(format!("{both:?} is both blacklisted and whitelisted"));
        }
        let greylist = names
            .into_iter()
            .filter(|name| !blacklist.contains(name) && !whitelist.contains(name))
            .collect();
        Ok(Self {
            identifier: identifier.to_string(),
            curriculum_year: document.grade,
            blacklist,
            whitelist,
            greylist,
        })
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub const fn curriculum_year(&self) -> CurriculumYear {
        self.curriculum_year
    }

    #[must_use]
    pub const fn blacklist(&self) -> &BTreeSet<String> {
        &self.blacklist
    }

    #[must_use]
    pub const fn whitelist(&self) -> &BTreeSet<String> {
        &self.whitelist
    }

    /// Undetermined names, in catalog order.
    #[must_use]
    pub fn greylist(&self) -> &[String] {
        &self.greylist
    }

    /// Record whether the respondent knows `name`.
    ///
    /// Classification is single-destination: once blacklisted, a course is
    /// never whitelisted again.
    pub fn mark(&mut self, name: &str, availability: Availability) {
        self.greylist.retain(|grey| grey != name);
        match availability {
            Availability::Unavailable => {
                self.whitelist.remove(name);
                self.blacklist.insert(name.to_string());
            }
            Availability::Available => {
                if self.blacklist.contains(name) {
                    tracing::debug!(course = name, "ignoring availability for blacklisted course");
                } else {
                    self.whitelist.insert(name.to_string());
                }
            }
        }
    }

    /// Whitelist every still-undetermined name in `known`. Returns how many
    /// moved. Names outside the greylist are ignored.
    pub fn seed_known<I, S>(&mut self, known: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let known: BTreeSet<String> = known
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        let before = self.whitelist.len();
        let (seeded, grey): (Vec<String>, Vec<String>) = std::mem::take(&mut self.greylist)
            .into_iter()
            .partition(|name| known.contains(name));
        self.greylist = grey;
        self.whitelist.extend(seeded);
        self.whitelist.len() - before
    }

    /// Remove the names at two distinct greylist positions, returning them.
    pub(crate) fn take_grey_pair(&mut self, first: usize, second: usize) -> (String, String) {
        let (hi, lo) = if first > second {
            (first, second)
        } else {
            (second, first)
        };
        let hi_name = self.greylist.remove(hi);
        let lo_name = self.greylist.remove(lo);
        if first > second {
            (hi_name, lo_name)
        } else {
            (lo_name, hi_name)
        }
    }

    fn to_document(&self) -> ProfileDocument {
        ProfileDocument {
            grade: self.curriculum_year,
            blacklist: self.blacklist.iter().cloned().collect(),
            whitelist: self.whitelist.iter().cloned().collect(),
            updated_at: Some(Utc::now()),
        }
    }
}

/// Persisted form of a profile (`<id>.profile`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub grade: CurriculumYear,
    #[serde(default)]
    pub blacklist: Vec<String>,
    #[serde(default)]
    pub whitelist: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Loads, initializes and commits respondent profiles.
pub struct ClassificationStore {
    store: Arc<dyn KvStore>,
    catalog: Arc<CourseCatalog>,
    locks: Arc<KeyLocks>,
}

impl ClassificationStore {
    pub fn new(store: Arc<dyn KvStore>, catalog: Arc<CourseCatalog>, locks: Arc<KeyLocks>) -> Self {
        Self {
            store,
            catalog,
            locks,
        }
    }

    /// The persisted profile for `identifier`, if any.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Corrupt` if the stored document cannot be
    /// decoded or its lists overlap, plus store and catalog failures.
    pub fn load(&self, identifier: &str) -> Result<Option<RespondentProfile>, SurveyError> {
        let key = artifact_key(identifier, ArtifactKind::Profile)?;
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };
        let document: ProfileDocument =
            serde_json::from_slice(&raw).map_err(|e| SurveyError::corrupt(&key, e))?;
        let names = self.catalog.names(document.grade)?;
        let profile = RespondentProfile::from_document(identifier, document, names)
            .map_err(|reason| SurveyError::corrupt(&key, reason))?;
        tracing::debug!(
            grey = profile.greylist.len(),
            white = profile.whitelist.len(),
            black = profile.blacklist.len(),
            "loaded respondent profile"
        );
        Ok(Some(profile))
    }

    /// Load the profile for `identifier`, or start a fresh one for `year`.
    ///
    /// A returning respondent keeps the year they first chose; a different
    /// `year` is ignored. Nothing is written until [`commit`](Self::commit).
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load); also fails if no catalog exists for `year`.
    pub fn initialize(
        &self,
        identifier: &str,
        year: CurriculumYear,
    ) -> Result<RespondentProfile, SurveyError> {
        if let Some(profile) = self.load(identifier)? {
            if profile.curriculum_year != year {
                tracing::warn!(
                    stored = %profile.curriculum_year,
                    requested = %year,
                    "respondent already has a curriculum year; keeping the stored one"
                );
            }
            return Ok(profile);
        }
        let names = self.catalog.names(year)?;
        tracing::debug!(%year, courses = names.len(), "starting fresh respondent profile");
        Ok(RespondentProfile::fresh(identifier, year, names))
    }

    /// Persist year and black/white lists, replacing the previous document.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::InvalidArgument` if the lists overlap (nothing
    /// is written), or a store error if the write fails.
    pub fn commit(&self, profile: &RespondentProfile) -> Result<(), SurveyError> {
        if let Some(both) = profile.blacklist.intersection(&profile.whitelist).next() {
            return Err(SurveyError::invalid(format!(
                "course {both:?} cannot be both blacklisted and whitelisted"
            )));
        }
        let key = artifact_key(&profile.identifier, ArtifactKind::Profile)?;
        let body = serde_json::to_vec(&profile.to_document())
            .map_err(|e| SurveyError::invalid(format!("serialize profile: {e}")))?;
        self.locks.with_lock(&profile.identifier, || self.store.put(&key, &body))?;
        tracing::info!(
            white = profile.whitelist.len(),
            black = profile.blacklist.len(),
            "committed respondent profile"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ClassificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationStore")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use opinia_core::{CourseItem, StaticSource};
    use opinia_store::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn year(y: u16) -> CurriculumYear {
        CurriculumYear::new(y).unwrap()
    }

    fn fixture() -> (Arc<MemoryStore>, ClassificationStore) {
        let source = StaticSource::new()
            .with_year(
                year(2020),
                vec![
                    CourseItem::new(1, "CS101"),
                    CourseItem::new(2, "CS102"),
                    CourseItem::new(3, "Math201"),
                ],
            )
            .with_year(year(2021), vec![CourseItem::new(1, "Phys101")]);
        let store = Arc::new(MemoryStore::new());
        let classification = ClassificationStore::new(
            store.clone(),
            Arc::new(CourseCatalog::new(source)),
            Arc::new(KeyLocks::new()),
        );
        (store, classification)
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn fresh_profile_is_all_grey() {
        let (_, store) = fixture();
        let profile = store.initialize("abc", year(2020)).unwrap();
        assert_eq!(profile.greylist(), ["CS101", "CS102", "Math201"]);
        assert!(profile.whitelist().is_empty());
        assert!(profile.blacklist().is_empty());
        assert!(store.load("abc").unwrap().is_none());
    }

    #[test]
    fn commit_then_load_recomputes_greylist() {
        let (_, store) = fixture();
        let mut profile = store.initialize("abc", year(2020)).unwrap();
        profile.mark("CS101", Availability::Unavailable);
        profile.mark("Math201", Availability::Available);
        store.commit(&profile).unwrap();

        let loaded = store.load("abc").unwrap().unwrap();
        assert_eq!(loaded.blacklist(), &set(&["CS101"]));
        assert_eq!(loaded.whitelist(), &set(&["Math201"]));
        assert_eq!(loaded.greylist(), ["CS102"]);
    }

    #[test]
    fn stored_year_wins_over_requested() {
        let (_, store) = fixture();
        let profile = store.initialize("abc", year(2020)).unwrap();
        store.commit(&profile).unwrap();

        let again = store.initialize("abc", year(2021)).unwrap();
        assert_eq!(again.curriculum_year(), year(2020));
        assert_eq!(again.greylist().len(), 3);
    }

    #[test]
    fn blacklist_is_single_destination() {
        let (_, store) = fixture();
        let mut profile = store.initialize("abc", year(2020)).unwrap();
        profile.mark("CS101", Availability::Available);
        profile.mark("CS101", Availability::Unavailable);
        profile.mark("CS101", Availability::Available);
        assert_eq!(profile.blacklist(), &set(&["CS101"]));
        assert!(profile.whitelist().is_empty());
        assert!(!profile.greylist().contains(&"CS101".to_string()));
    }

    #[test]
    fn overlapping_lists_are_not_committed() {
        let (backing, store) = fixture();
        let profile = RespondentProfile {
            identifier: "abc".into(),
            curriculum_year: year(2020),
            blacklist: set(&["CS101"]),
            whitelist: set(&["CS101"]),
            greylist: Vec::new(),
        };
        let err = store.commit(&profile).unwrap_err();
        assert!(matches!(err, SurveyError::InvalidArgument(_)));
        assert!(backing.get("abc.profile").unwrap().is_none());
    }

    #[test]
    fn overlapping_document_is_corrupt() {
        let (backing, store) = fixture();
        backing
            .put(
                "abc.profile",
                br#"{"grade":2020,"blacklist":["CS101"],"whitelist":["CS101"]}"#,
            )
            .unwrap();
        assert!(matches!(
            store.load("abc"),
            Err(SurveyError::Corrupt { .. })
        ));
    }

    #[test]
    fn undecodable_document_is_corrupt() {
        let (backing, store) = fixture();
        backing.put("abc.profile", b"not json").unwrap();
        assert!(matches!(
            store.load("abc"),
            Err(SurveyError::Corrupt { .. })
        ));
    }

    #[test]
    fn document_keeps_grade_field_name() {
        let (backing, store) = fixture();
        let profile = store.initialize("abc", year(2020)).unwrap();
        store.commit(&profile).unwrap();
        let raw = backing.get("abc.profile").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["grade"], 2020);
        assert!(value["updated_at"].is_string());
    }

    #[test]
    fn seeding_only_moves_grey_catalog_names() {
        let (_, store) = fixture();
        let mut profile = store.initialize("abc", year(2020)).unwrap();
        profile.mark("CS102", Availability::Unavailable);
        let moved = profile.seed_known(["CS101", "CS102", "Unknown999"]);
        assert_eq!(moved, 1);
        assert_eq!(profile.whitelist(), &set(&["CS101"]));
        assert_eq!(profile.blacklist(), &set(&["CS102"]));
        assert_eq!(profile.greylist(), ["Math201"]);
    }

    #[test]
    fn take_grey_pair_preserves_draw_order() {
        let mut profile =
            RespondentProfile::fresh("abc", year(2020), vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(profile.take_grey_pair(2, 0), ("C".to_string(), "A".to_string()));
        assert_eq!(profile.greylist(), ["B"]);
    }
}
