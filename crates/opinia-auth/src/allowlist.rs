//! Who may log in at all, checked before any upstream call.

use std::collections::HashSet;

#[derive(Debug, Clone)]
pub enum Allowlist {
    /// Anyone the upstream accepts.
    Anyone,
    /// Only the listed subjects.
    Only(HashSet<String>),
}

impl Allowlist {
    /// Respondent list: an empty list means nobody is excluded.
    pub fn respondents<I, S>(uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let uids: HashSet<String> = uids.into_iter().map(Into::into).collect();
        if uids.is_empty() {
            Self::Anyone
        } else {
            Self::Only(uids)
        }
    }

    /// Administrator list: an empty list admits nobody.
    pub fn admins<I, S>(uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(uids.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn permits(&self, subject: &str) -> bool {
        match self {
            Self::Anyone => true,
            Self::Only(allowed) => allowed.contains(subject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_respondent_list_is_open() {
        let list = Allowlist::respondents(Vec::<String>::new());
        assert!(list.permits("anyone"));
    }

    #[test]
    fn empty_admin_list_is_closed() {
        let list = Allowlist::admins(Vec::<String>::new());
        assert!(!list.permits("anyone"));
    }

    #[test]
    fn listed_subjects_only() {
        let list = Allowlist::respondents(["2000012345"]);
        assert!(list.permits("2000012345"));
        assert!(!list.permits("2000054321"));
    }
}
