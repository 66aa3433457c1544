//! Comparison Recorder: the append-only per-respondent log (`<id>.log`).

use std::sync::Arc;

use opinia_core::ComparisonRecord;
use opinia_store::{ArtifactKind, KvStore, artifact_key};

use crate::error::SurveyError;

pub struct ComparisonRecorder {
    store: Arc<dyn KvStore>,
}

impl ComparisonRecorder {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Append one record. Identical records are kept; repeats are signal.
    ///
    /// # Errors
    ///
    /// Returns a store error if the append fails.
    pub fn record(&self, identifier: &str, record: &ComparisonRecord) -> Result<(), SurveyError> {
        let key = artifact_key(identifier, ArtifactKind::Log)?;
        let mut line = record.to_line();
        line.push('\n');
        self.store.append(&key, line.as_bytes())?;
        tracing::info!(
            usefulness = %record.usefulness,
            relatedness = %record.relatedness,
            "recorded comparison"
        );
        Ok(())
    }

    /// Every record for `identifier`, in the order written.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Corrupt` if a line cannot be parsed.
    pub fn history(&self, identifier: &str) -> Result<Vec<ComparisonRecord>, SurveyError> {
        let key = artifact_key(identifier, ArtifactKind::Log)?;
        let Some(raw) = self.store.get(&key)? else {
            return Ok(Vec::new());
        };
        let text = String::from_utf8(raw).map_err(|e| SurveyError::corrupt(&key, e))?;
        text.lines()
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(n, line)| {
                ComparisonRecord::from_line(line)
                    .map_err(|e| SurveyError::corrupt(&key, format!("line {}: {e}", n + 1)))
            })
            .collect()
    }

    /// Number of records for `identifier`.
    ///
    /// # Errors
    ///
    /// See [`history`](Self::history).
    pub fn count(&self, identifier: &str) -> Result<usize, SurveyError> {
        Ok(self.history(identifier)?.len())
    }
}

impl std::fmt::Debug for ComparisonRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonRecorder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use opinia_core::Preference;
    use opinia_store::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(a: &str, b: &str, u: Preference, r: Preference) -> ComparisonRecord {
        ComparisonRecord::new(a, b, u, r).unwrap()
    }

    #[test]
    fn records_are_appended_in_order() {
        let store = Arc::new(MemoryStore::new());
        let recorder = ComparisonRecorder::new(store.clone());
        let first = record("CS101", "CS102", Preference::Second, Preference::First);
        let second = record("CS102", "Math201", Preference::Neutral, Preference::Neutral);

        recorder.record("abc", &first).unwrap();
        recorder.record("abc", &second).unwrap();
        recorder.record("abc", &first).unwrap();

        assert_eq!(recorder.history("abc").unwrap(), vec![first.clone(), second, first]);
        let raw = store.get("abc.log").unwrap().unwrap();
        assert_eq!(
            String::from_utf8(raw).unwrap(),
            "CS101\tCS102\t1\t-1\nCS102\tMath201\t0\t0\nCS101\tCS102\t1\t-1\n"
        );
    }

    #[test]
    fn missing_log_is_empty() {
        let recorder = ComparisonRecorder::new(Arc::new(MemoryStore::new()));
        assert!(recorder.history("abc").unwrap().is_empty());
        assert_eq!(recorder.count("abc").unwrap(), 0);
    }

    #[test]
    fn malformed_line_is_corrupt() {
        let store = Arc::new(MemoryStore::new());
        store.append("abc.log", b"CS101\tCS102\t1\n").unwrap();
        let recorder = ComparisonRecorder::new(store);
        let err = recorder.history("abc").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
