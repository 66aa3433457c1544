//! Domain types shared across the survey pipeline.
//!
//! All enums use `snake_case` serialization. Values that have a fixed numeric
//! encoding in persisted artifacts (`CurriculumYear`, `Preference`) serialize
//! as bare integers and re-validate on the way back in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// CurriculumYear
// ---------------------------------------------------------------------------

/// The curriculum ("培养方案") year a respondent is enrolled under.
///
/// Only years with a published catalog are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct CurriculumYear(u16);

impl CurriculumYear {
    pub const MIN: u16 = 2019;
    pub const MAX: u16 = 2022;

    /// Validate a raw year.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if `year` is outside 2019..=2022.
    pub fn new(year: u16) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&year) {
            Ok(Self(year))
        } else {
            Err(CoreError::invalid(format!(
                "curriculum year must be between {} and {}, got {year}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Every supported year, oldest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u16> for CurriculumYear {
    type Error = CoreError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurriculumYear> for u16 {
    fn from(value: CurriculumYear) -> Self {
        value.0
    }
}

impl fmt::Display for CurriculumYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CourseItem
// ---------------------------------------------------------------------------

/// One entry of a per-year course catalog.
///
/// Identity is `id`; `name` is the key used everywhere else and is unique
/// within a catalog year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseItem {
    pub id: i64,
    pub name: String,
}

impl CourseItem {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Reject names that would break the tab-delimited comparison log or the
/// line-per-entry suggestion list.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` for empty names or names containing
/// a tab, carriage return, or line feed.
pub fn ensure_loggable(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid("course name must not be empty"));
    }
    if name.contains(['\t', '\r', '\n']) {
        return Err(CoreError::invalid(format!(
            "course name must not contain tabs or line breaks: {name:?}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Preference
// ---------------------------------------------------------------------------

/// Answer to "which of the two courses is more X?".
///
/// ```text
/// -1  first course preferred
///  0  no clear preference
///  1  second course preferred
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Preference {
    First,
    Neutral,
    Second,
}

impl Preference {
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::First => -1,
            Self::Neutral => 0,
            Self::Second => 1,
        }
    }
}

impl TryFrom<i8> for Preference {
    type Error = CoreError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::First),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Second),
            other => Err(CoreError::invalid(format!(
                "preference must be -1, 0 or 1, got {other}"
            ))),
        }
    }
}

impl From<Preference> for i8 {
    fn from(value: Preference) -> Self {
        value.as_i8()
    }
}

impl FromStr for Preference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i8>()
            .map_err(|_| CoreError::invalid(format!("preference must be -1, 0 or 1, got {s:?}")))?;
        Self::try_from(raw)
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

// ---------------------------------------------------------------------------
// SamplingMode
// ---------------------------------------------------------------------------

/// Which pool a survey round was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Drawn from the greylist, to learn whether the respondent knows the courses.
    Explore,
    /// Drawn from the whitelist, to collect preference signal.
    Exploit,
}

impl SamplingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explore => "explore",
            Self::Exploit => "exploit",
        }
    }

    /// The pool the policy falls back to when this one is exhausted.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Explore => Self::Exploit,
            Self::Exploit => Self::Explore,
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ComparisonRecord
// ---------------------------------------------------------------------------

/// One completed comparison round, as exported for analysis.
///
/// The persisted form is a single tab-delimited line:
/// `course_a \t course_b \t usefulness \t relatedness`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub course_a: String,
    pub course_b: String,
    pub usefulness: Preference,
    pub relatedness: Preference,
}

impl ComparisonRecord {
    /// Build a record, rejecting names that cannot be logged and self-comparisons.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if either name fails
    /// [`ensure_loggable`] or both names are equal.
    pub fn new(
        course_a: impl Into<String>,
        course_b: impl Into<String>,
        usefulness: Preference,
        relatedness: Preference,
    ) -> Result<Self, CoreError> {
        let course_a = course_a.into();
        let course_b = course_b.into();
        ensure_loggable(&course_a)?;
        ensure_loggable(&course_b)?;
        if course_a == course_b {
            return Err(CoreError::invalid(format!(
                "a course cannot be compared with itself: {course_a}"
            )));
        }
        Ok(Self {
            course_a,
            course_b,
            usefulness,
            relatedness,
        })
    }

    /// Render the log line, without the trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.course_a, self.course_b, self.usefulness, self.relatedness
        )
    }

    /// Parse one log line (a trailing newline is tolerated).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the line does not have exactly
    /// four fields or a verdict is not -1, 0 or 1.
    pub fn from_line(line: &str) -> Result<Self, CoreError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split('\t').collect();
        let [course_a, course_b, usefulness, relatedness] = fields.as_slice() else {
            return Err(CoreError::invalid(format!(
                "comparison line must have 4 tab-separated fields, got {}",
                fields.len()
            )));
        };
        Self::new(
            *course_a,
            *course_b,
            usefulness.parse()?,
            relatedness.parse()?,
        )
    }
}

impl fmt::Display for ComparisonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(2019)]
    #[case(2020)]
    #[case(2021)]
    #[case(2022)]
    fn supported_years_are_accepted(#[case] year: u16) {
        assert_eq!(CurriculumYear::new(year).expect("valid year").get(), year);
    }

    #[rstest]
    #[case(0)]
    #[case(2018)]
    #[case(2023)]
    fn unsupported_years_are_rejected(#[case] year: u16) {
        let err = CurriculumYear::new(year).expect_err("should reject");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn year_deserialization_revalidates() {
        let ok: CurriculumYear = serde_json::from_str("2021").expect("should parse");
        assert_eq!(ok.get(), 2021);
        assert!(serde_json::from_str::<CurriculumYear>("2030").is_err());
    }

    #[test]
    fn all_years_are_ordered() {
        let years: Vec<u16> = CurriculumYear::all().map(CurriculumYear::get).collect();
        assert_eq!(years, vec![2019, 2020, 2021, 2022]);
    }

    #[test]
    fn preference_parses_scale() {
        assert_eq!("-1".parse::<Preference>().unwrap(), Preference::First);
        assert_eq!(" 0 ".parse::<Preference>().unwrap(), Preference::Neutral);
        assert_eq!("1".parse::<Preference>().unwrap(), Preference::Second);
        assert!("2".parse::<Preference>().is_err());
        assert!("left".parse::<Preference>().is_err());
    }

    #[test]
    fn preference_serializes_as_integer() {
        let json = serde_json::to_string(&Preference::First).unwrap();
        assert_eq!(json, "-1");
    }

    #[test]
    fn comparison_line_matches_log_format() {
        let record =
            ComparisonRecord::new("CS101", "Math201", Preference::Second, Preference::First)
                .unwrap();
        assert_eq!(record.to_line(), "CS101\tMath201\t1\t-1");
        assert_eq!(ComparisonRecord::from_line("CS101\tMath201\t1\t-1\n").unwrap(), record);
    }

    #[test]
    fn comparison_rejects_self_pair() {
        let err = ComparisonRecord::new("CS101", "CS101", Preference::Neutral, Preference::Neutral)
            .expect_err("self pair");
        assert!(err.to_string().contains("itself"));
    }

    #[test]
    fn comparison_line_with_wrong_arity_is_rejected() {
        assert!(ComparisonRecord::from_line("CS101\tCS102\t0").is_err());
        assert!(ComparisonRecord::from_line("CS101\tCS102\t0\t0\t0").is_err());
    }

    #[test]
    fn names_with_delimiters_are_not_loggable() {
        assert!(ensure_loggable("Data\tStructures").is_err());
        assert!(ensure_loggable("Line\nBreak").is_err());
        assert!(ensure_loggable("   ").is_err());
        assert!(ensure_loggable("数据结构与算法").is_ok());
    }

    #[test]
    fn sampling_mode_other_flips() {
        assert_eq!(SamplingMode::Explore.other(), SamplingMode::Exploit);
        assert_eq!(SamplingMode::Exploit.other(), SamplingMode::Explore);
    }
}
