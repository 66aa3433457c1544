//! Artifact administration: enumerate, inspect and delete stored artifacts.

use std::sync::Arc;

use serde::Serialize;

use opinia_store::{ArtifactKind, KvStore};

use crate::error::SurveyError;

/// One stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactEntry {
    pub name: String,
    pub kind: &'static str,
}

pub struct ArtifactAdmin {
    store: Arc<dyn KvStore>,
}

impl ArtifactAdmin {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Artifacts of `kind`, or of every kind, sorted by name. Keys that are
    /// not respondent artifacts are skipped.
    ///
    /// # Errors
    ///
    /// Returns a store error if the backend cannot be listed.
    pub fn list(&self, kind: Option<ArtifactKind>) -> Result<Vec<ArtifactEntry>, SurveyError> {
        let keys = match kind {
            Some(kind) => self.store.list_by_suffix(kind.suffix())?,
            None => self.store.list()?,
        };
        Ok(keys
            .into_iter()
            .filter_map(|name| {
                ArtifactKind::of_key(&name).map(|kind| ArtifactEntry {
                    name,
                    kind: kind.as_str(),
                })
            })
            .collect())
    }

    /// Artifact contents as text. Invalid UTF-8 is replaced, not rejected.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::NotFound` if no artifact has that name.
    pub fn read(&self, name: &str) -> Result<String, SurveyError> {
        let raw = self.store.get(name)?.ok_or_else(|| not_found(name))?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// # Errors
    ///
    /// Returns `SurveyError::NotFound` if no artifact has that name.
    pub fn delete(&self, name: &str) -> Result<(), SurveyError> {
        if !self.store.delete(name)? {
            return Err(not_found(name));
        }
        tracing::warn!(artifact = name, "artifact deleted by administrator");
        Ok(())
    }
}

impl std::fmt::Debug for ArtifactAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactAdmin").finish_non_exhaustive()
    }
}

fn not_found(name: &str) -> SurveyError {
    SurveyError::NotFound {
        what: "artifact".into(),
        name: name.to_string(),
    }
}
