//! Artifact key naming.

use std::fmt;

use crate::error::StoreError;

/// The three per-respondent artifact types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Profile,
    Log,
    Suggestions,
}

impl ArtifactKind {
    pub const ALL: [Self; 3] = [Self::Profile, Self::Log, Self::Suggestions];

    /// File-name suffix, including the leading dot.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Profile => ".profile",
            Self::Log => ".log",
            Self::Suggestions => ".suggestions",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Log => "log",
            Self::Suggestions => "suggestions",
        }
    }

    /// Classify a key by its suffix.
    #[must_use]
    pub fn of_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            key.strip_suffix(kind.suffix())
                .is_some_and(|stem| !stem.is_empty())
        })
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key for one respondent artifact: `<identifier><suffix>`.
///
/// # Errors
///
/// Returns `StoreError::InvalidKey` if the identifier would escape the
/// store's flat namespace.
pub fn artifact_key(identifier: &str, kind: ArtifactKind) -> Result<String, StoreError> {
    let key = format!("{identifier}{}", kind.suffix());
    validate_key(&key)?;
    if identifier.is_empty() || identifier.contains('.') {
        return Err(StoreError::InvalidKey(key));
    }
    Ok(key)
}

/// Accept only flat, non-hidden names.
///
/// # Errors
///
/// Returns `StoreError::InvalidKey` for empty keys, keys with path
/// separators or NUL bytes, keys starting with a dot, and `..`.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0'])
        || key.contains("..");
    if bad {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn keys_use_kind_suffix() {
        assert_eq!(
            artifact_key("ab12", ArtifactKind::Profile).unwrap(),
            "ab12.profile"
        );
        assert_eq!(artifact_key("ab12", ArtifactKind::Log).unwrap(), "ab12.log");
        assert_eq!(
            artifact_key("ab12", ArtifactKind::Suggestions).unwrap(),
            "ab12.suggestions"
        );
    }

    #[rstest]
    #[case("")]
    #[case("../etc/passwd")]
    #[case("a/b")]
    #[case("a.b")]
    fn bad_identifiers_are_rejected(#[case] identifier: &str) {
        assert!(artifact_key(identifier, ArtifactKind::Log).is_err());
    }

    #[rstest]
    #[case(".hidden")]
    #[case("..")]
    #[case("dir\\file")]
    #[case("nul\0byte")]
    fn bad_keys_are_rejected(#[case] key: &str) {
        assert!(matches!(validate_key(key), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn kind_is_recovered_from_key() {
        assert_eq!(ArtifactKind::of_key("ab12.log"), Some(ArtifactKind::Log));
        assert_eq!(
            ArtifactKind::of_key("ab12.suggestions"),
            Some(ArtifactKind::Suggestions)
        );
        assert_eq!(ArtifactKind::of_key(".log"), None);
        assert_eq!(ArtifactKind::of_key("ab12.txt"), None);
    }
}
