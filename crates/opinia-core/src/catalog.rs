//! Per-year course catalogs.
//!
//! Catalogs are static reference data: one JSON array of `{"id", "name"}`
//! objects per curriculum year. [`CourseCatalog`] validates the year, reads
//! through a [`CatalogSource`] once, and serves the cached list for the rest
//! of the process lifetime.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Context;

use crate::errors::CoreError;
use crate::types::{CourseItem, CurriculumYear, ensure_loggable};

/// Where catalog data comes from.
pub trait CatalogSource: Send + Sync {
    /// Read the raw course list for one year.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no catalog exists for `year`, or
    /// `CoreError::Other` if it exists but cannot be read or decoded.
    fn read(&self, year: CurriculumYear) -> Result<Vec<CourseItem>, CoreError>;
}

/// Reads `<root>/<year>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, year: CurriculumYear) -> PathBuf {
        self.root.join(format!("{year}.json"))
    }
}

impl CatalogSource for DirectorySource {
    fn read(&self, year: CurriculumYear) -> Result<Vec<CourseItem>, CoreError> {
        let path = self.path_for(year);
        if !path.is_file() {
            return Err(CoreError::NotFound {
                kind: "catalog".into(),
                name: path.display().to_string(),
            });
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let items = serde_json::from_str(&raw)
            .with_context(|| format!("failed to decode catalog {}", path.display()))?;
        Ok(items)
    }
}

/// In-memory catalogs keyed by year.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    years: HashMap<CurriculumYear, Vec<CourseItem>>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_year(mut self, year: CurriculumYear, items: Vec<CourseItem>) -> Self {
        self.years.insert(year, items);
        self
    }
}

impl CatalogSource for StaticSource {
    fn read(&self, year: CurriculumYear) -> Result<Vec<CourseItem>, CoreError> {
        self.years
            .get(&year)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                kind: "catalog".into(),
                name: year.to_string(),
            })
    }
}

/// Validating, caching front for a [`CatalogSource`].
pub struct CourseCatalog {
    source: Box<dyn CatalogSource>,
    cache: RwLock<HashMap<CurriculumYear, Arc<[CourseItem]>>>,
}

impl CourseCatalog {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load the catalog for a raw year.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` for years outside 2019..=2022 and
    /// for catalogs with duplicate or unloggable names, plus whatever the
    /// source reports.
    pub fn load(&self, year: u16) -> Result<Arc<[CourseItem]>, CoreError> {
        self.load_year(CurriculumYear::new(year)?)
    }

    /// Load the catalog for an already-validated year.
    ///
    /// # Errors
    ///
    /// See [`CourseCatalog::load`].
    pub fn load_year(&self, year: CurriculumYear) -> Result<Arc<[CourseItem]>, CoreError> {
        if let Some(items) = self.cached(year) {
            return Ok(items);
        }

        let items = self.source.read(year)?;
        validate(year, &items)?;
        let items: Arc<[CourseItem]> = items.into();
        tracing::debug!(%year, courses = items.len(), "loaded course catalog");

        let mut cache = self
            .cache
            .write()
            .map_err(|_| CoreError::Other(anyhow::anyhow!("catalog cache lock poisoned")))?;
        Ok(Arc::clone(cache.entry(year).or_insert(items)))
    }

    /// Course names for `year`, in catalog order.
    ///
    /// # Errors
    ///
    /// See [`CourseCatalog::load`].
    pub fn names(&self, year: CurriculumYear) -> Result<Vec<String>, CoreError> {
        Ok(self
            .load_year(year)?
            .iter()
            .map(|item| item.name.clone())
            .collect())
    }

    fn cached(&self, year: CurriculumYear) -> Option<Arc<[CourseItem]>> {
        self.cache
            .read()
            .ok()
            .and_then(|cache| cache.get(&year).cloned())
    }
}

impl std::fmt::Debug for CourseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cache.read().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("CourseCatalog")
            .field("cached_years", &cached)
            .finish_non_exhaustive()
    }
}

fn validate(year: CurriculumYear, items: &[CourseItem]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        ensure_loggable(&item.name)?;
        if !seen.insert(item.name.as_str()) {
            return Err(CoreError::InvalidArgument(format!(
                "catalog {year} lists course name {:?} more than once",
                item.name
            )));
        }
    }
    Ok(())
}
