//! # opinia-survey
//!
//! The survey engine: which courses a respondent knows, which pair to ask
//! about next, and what they answered.
//!
//! - [`ClassificationStore`]: per-respondent black/white/grey course lists
//! - [`PairSampler`]: the explore/exploit pair selection policy
//! - [`ComparisonRecorder`]: the append-only comparison log
//! - [`SuggestionList`]: freeform "please add this course" suggestions
//! - [`SurveySession`]: one respondent's live session, tying the above together
//! - [`ArtifactAdmin`]: list, read and delete stored artifacts
//!
//! All persistence goes through `opinia_store::KvStore`.

pub mod admin;
pub mod classification;
pub mod error;
pub mod recorder;
pub mod sampling;
pub mod service;
pub mod session;
pub mod suggestions;

pub use admin::{ArtifactAdmin, ArtifactEntry};
pub use classification::{Availability, ClassificationStore, ProfileDocument, RespondentProfile};
pub use error::SurveyError;
pub use recorder::ComparisonRecorder;
pub use sampling::{CoursePair, DEFAULT_EXPLORATION_FLOOR, PairSampler};
pub use service::SurveyService;
pub use session::{Progress, RoundAnswer, RoundSummary, SurveySession};
pub use suggestions::SuggestionList;
