//! Suggestion List Manager: courses a respondent proposes adding
//! (`<id>.suggestions`, one name per line).
//!
//! Every mutation rewrites the whole list under the respondent's lock.

use std::sync::Arc;

use opinia_core::ensure_loggable;
use opinia_store::{ArtifactKind, KeyLocks, KvStore, artifact_key};

use crate::error::SurveyError;

pub struct SuggestionList {
    store: Arc<dyn KvStore>,
    locks: Arc<KeyLocks>,
}

impl SuggestionList {
    pub fn new(store: Arc<dyn KvStore>, locks: Arc<KeyLocks>) -> Self {
        Self { store, locks }
    }

    /// Current suggestions, in the order added.
    ///
    /// # Errors
    ///
    /// Returns a store error or `SurveyError::Corrupt` for non-UTF-8 content.
    pub fn list(&self, identifier: &str) -> Result<Vec<String>, SurveyError> {
        let key = artifact_key(identifier, ArtifactKind::Suggestions)?;
        self.read(&key)
    }

    /// Add `name` unless already present. Returns whether it was added.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::InvalidArgument` for empty names or names with
    /// line breaks, or a store error.
    pub fn add(&self, identifier: &str, name: &str) -> Result<bool, SurveyError> {
        let name = normalize(name)?;
        let key = artifact_key(identifier, ArtifactKind::Suggestions)?;
        self.locks.with_lock(identifier, || {
            let mut names = self.read(&key)?;
            if names.iter().any(|existing| *existing == name) {
                tracing::debug!("suggestion already present");
                return Ok(false);
            }
            names.push(name);
            self.write(&key, &names)?;
            tracing::info!(total = names.len(), "added suggestion");
            Ok(true)
        })
    }

    /// Remove `name`.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::NotFound` if `name` is not in the list.
    pub fn remove(&self, identifier: &str, name: &str) -> Result<(), SurveyError> {
        let name = normalize(name)?;
        let key = artifact_key(identifier, ArtifactKind::Suggestions)?;
        self.locks.with_lock(identifier, || {
            let mut names = self.read(&key)?;
            let Some(position) = names.iter().position(|existing| *existing == name) else {
                return Err(SurveyError::NotFound {
                    what: "suggestion".into(),
                    name,
                });
            };
            names.remove(position);
            self.write(&key, &names)?;
            tracing::info!(total = names.len(), "removed suggestion");
            Ok(())
        })
    }

    fn read(&self, key: &str) -> Result<Vec<String>, SurveyError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        let text = String::from_utf8(raw).map_err(|e| SurveyError::corrupt(key, e))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn write(&self, key: &str, names: &[String]) -> Result<(), SurveyError> {
        let mut body = String::new();
        for name in names {
            body.push_str(name);
            body.push('\n');
        }
        self.store.put(key, body.as_bytes())?;
        Ok(())
    }
}

impl std::fmt::Debug for SuggestionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionList").finish_non_exhaustive()
    }
}

fn normalize(name: &str) -> Result<String, SurveyError> {
    let name = name.trim();
    ensure_loggable(name)?;
    Ok(name.to_string())
}
