//! One-way respondent identifiers.
//!
//! A verified credential (student ID or email address) is turned into an
//! opaque identifier by chaining SHA-256 over a set of server-side salts:
//!
//! ```text
//! acc = credential
//! for salt in sorted(salts):
//!     acc = hex(sha256(acc + salt))
//! ```
//!
//! Salts are sorted first so the result does not depend on the order the
//! secrets were stored in. Nothing about the credential is recoverable from
//! the identifier, and the same credential and salt set always map to the
//! same identifier.

use sha2::{Digest, Sha256};

use crate::errors::CoreError;

/// Apply the salted hash chain to `credential`.
///
/// With an empty salt set this returns `credential` unchanged; use
/// [`IdentityResolver`] where that must not happen.
#[must_use]
pub fn resolve<S: AsRef<str>>(credential: &str, salts: &[S]) -> String {
    let mut sorted: Vec<&str> = salts.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    chain(credential, &sorted)
}

/// Raw digest of the final round, for callers that need bytes rather than hex.
///
/// Returns `None` for an empty salt set.
#[must_use]
pub fn resolve_digest<S: AsRef<str>>(credential: &str, salts: &[S]) -> Option<[u8; 32]> {
    let mut sorted: Vec<&str> = salts.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    let (last, rest) = sorted.split_last()?;
    let acc = chain(credential, rest);
    Some(digest(&acc, last))
}

fn chain(credential: &str, sorted_salts: &[&str]) -> String {
    sorted_salts
        .iter()
        .fold(credential.to_owned(), |acc, salt| hex::encode(digest(&acc, salt)))
}

fn digest(acc: &str, salt: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(acc.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.finalize().into()
}

/// Resolves credentials against a fixed, non-empty salt set.
#[derive(Clone)]
pub struct IdentityResolver {
    salts: Vec<String>,
}

impl IdentityResolver {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if `salts` is empty.
    pub fn new<I, S>(salts: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut salts: Vec<String> = salts.into_iter().map(Into::into).collect();
        if salts.is_empty() {
            return Err(CoreError::invalid(
                "identity resolution needs at least one salt",
            ));
        }
        salts.sort_unstable();
        Ok(Self { salts })
    }

    /// Derive the identifier for a credential. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the credential is blank.
    pub fn resolve(&self, credential: &str) -> Result<String, CoreError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(CoreError::invalid("credential must not be empty"));
        }
        Ok(resolve(credential, &self.salts))
    }

    /// Number of salts in the chain.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.salts.len()
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("rounds", &self.salts.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn resolution_is_deterministic() {
        let salts = ["pepper", "sea-salt"];
        assert_eq!(resolve("2000012345", &salts), resolve("2000012345", &salts));
    }

    #[test]
    fn salt_order_does_not_matter() {
        assert_eq!(resolve("x", &["b", "a"]), resolve("x", &["a", "b"]));
    }

    #[test]
    fn single_salt_is_plain_sha256_hex() {
        // sha256("abc") with the salt supplying the trailing "c".
        assert_eq!(
            resolve("ab", &["c"]),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn chain_feeds_hex_into_next_round() {
        let first = resolve("x", &["a"]);
        assert_eq!(resolve("x", &["a", "b"]), resolve(&first, &["b"]));
    }

    #[test]
    fn different_credentials_differ() {
        let salts = ["s1", "s2"];
        assert_ne!(resolve("alice", &salts), resolve("bob", &salts));
    }

    #[test]
    fn empty_salt_set_is_identity_for_raw_function() {
        let none: [&str; 0] = [];
        assert_eq!(resolve("x", &none), "x");
        assert!(resolve_digest("x", &none).is_none());
    }

    #[test]
    fn digest_matches_hex_output() {
        let salts = ["b", "a"];
        let bytes = resolve_digest("x", &salts).expect("non-empty salts");
        assert_eq!(hex::encode(bytes), resolve("x", &salts));
    }

    #[test]
    fn resolver_rejects_empty_salts() {
        let err = IdentityResolver::new(Vec::<String>::new()).expect_err("no salts");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn resolver_trims_and_rejects_blank_credentials() {
        let resolver = IdentityResolver::new(["b", "a"]).unwrap();
        assert_eq!(resolver.resolve("  x ").unwrap(), resolve("x", &["a", "b"]));
        assert!(resolver.resolve("   ").is_err());
        assert_eq!(resolver.rounds(), 2);
    }

    #[test]
    fn debug_does_not_leak_salts() {
        let resolver = IdentityResolver::new(["top-secret"]).unwrap();
        assert!(!format!("{resolver:?}").contains("top-secret"));
    }
}
