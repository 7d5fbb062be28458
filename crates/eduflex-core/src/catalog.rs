//! In-memory course catalog.
//!
//! Categories are standardized on load, so a query for "Social Sciences"
//! matches courses filed under "Psychology" or "History". Matches are
//! ordered by rating, highest first, and capped at the catalog's limit.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::model::CourseEntry;
use crate::subjects::Subject;
use crate::traits::{CatalogQuery, CourseCatalog};

/// Most courses a catalog returns for one query.
pub const DEFAULT_COURSE_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct LocalCatalog {
    name: String,
    courses: Vec<(Subject, CourseEntry)>,
    limit: usize,
}

impl LocalCatalog {
    pub fn new(name: impl Into<String>, courses: Vec<CourseEntry>) -> Self {
        let courses = courses
            .into_iter()
            .map(|c| (Subject::standardize(&c.category), c))
            .collect();
        Self {
            name: name.into(),
            courses,
            limit: DEFAULT_COURSE_LIMIT,
        }
    }

    /// Cap the number of courses returned per query. Zero is treated as one.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CourseEntry> {
        self.courses.iter().map(|(_, c)| c)
    }

    /// Courses whose name contains `needle` (case-insensitive), in catalog order.
    pub fn search(&self, needle: &str) -> Vec<&CourseEntry> {
        let needle = needle.to_lowercase();
        self.entries()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[async_trait]
impl CourseCatalog for LocalCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    /// Only when at least one entry carries a level.
    fn supports_tiers(&self) -> bool {
        self.courses.iter().any(|(_, c)| c.level.is_some())
    }

    async fn courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseEntry>> {
        let subject = Subject::standardize(&query.subject);
        let mut matches: Vec<CourseEntry> = self
            .courses
            .iter()
            .filter(|(s, _)| *s == subject)
            .map(|(_, c)| c)
            .filter(|c| query.tier.is_none_or(|t| c.matches_tier(t)))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        matches.truncate(self.limit);
        Ok(matches)
    }
}
