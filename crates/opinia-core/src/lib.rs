//! # opinia-core
//!
//! Core types, identity resolution, and course catalogs for Opinia.
//!
//! This crate provides the foundational pieces shared across all Opinia crates:
//! - Curriculum years, course items, and comparison records
//! - The preference scale used by both comparison questions
//! - One-way respondent identifier derivation from salted hashes
//! - Per-year course catalogs with process-lifetime caching
//! - Cross-cutting error types

pub mod catalog;
pub mod errors;
pub mod identity;
pub mod types;

pub use catalog::{CatalogSource, CourseCatalog, DirectorySource, StaticSource};
pub use errors::CoreError;
pub use identity::IdentityResolver;
pub use types::{
    ComparisonRecord, CourseItem, CurriculumYear, Preference, SamplingMode, ensure_loggable,
};
