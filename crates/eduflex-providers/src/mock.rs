//! Mock collaborators for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use eduflex_core::error::{CoreError, CoreResult};
use eduflex_core::model::{CourseEntry, Question};
use eduflex_core::traits::{CatalogQuery, CourseCatalog, QuestionBank};

/// A mock course catalog for exercising the service without a real backend.
///
/// Returns the courses registered for a subject (exact match), or fails every
/// call when built with [`MockCatalog::unavailable`].
pub struct MockCatalog {
    /// Map of subject → courses.
    courses: HashMap<String, Vec<CourseEntry>>,
    tiers: bool,
    unavailable: bool,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last query received.
    last_query: Mutex<Option<CatalogQuery>>,
}

impl MockCatalog {
    pub fn new(courses: HashMap<String, Vec<CourseEntry>>) -> Self {
        Self {
            courses,
            tiers: true,
            unavailable: false,
            call_count: AtomicU32::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// A catalog that answers every query with a network failure.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(HashMap::new())
        }
    }

    /// Report that the catalog has no tier data.
    pub fn without_tiers(mut self) -> Self {
        self.tiers = false;
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_query(&self) -> Option<CatalogQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl CourseCatalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_tiers(&self) -> bool {
        self.tiers
    }

    async fn courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseEntry>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_query.lock().unwrap() = Some(query.clone());

        if self.unavailable {
            return Err(CoreError::external("mock catalog unavailable"));
        }
        Ok(self.courses.get(&query.subject).cloned().unwrap_or_default())
    }
}

/// A mock question bank with fixed question sets.
pub struct MockQuestionBank {
    quizzes: Vec<(String, Vec<Question>)>,
    call_count: AtomicU32,
}

impl MockQuestionBank {
    pub fn new(quizzes: Vec<(String, Vec<Question>)>) -> Self {
        Self {
            quizzes,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuestionBank for MockQuestionBank {
    fn name(&self) -> &str {
        "mock"
    }

    async fn subjects(&self) -> CoreResult<Vec<String>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.quizzes.iter().map(|(s, _)| s.clone()).collect())
    }

    async fn quiz(&self, subject: &str) -> CoreResult<Vec<Question>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .quizzes
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, q)| q.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduflex_core::model::DifficultyTier;

    fn course(name: &str) -> CourseEntry {
        CourseEntry {
            name: name.into(),
            rating: 4.0,
            category: "health".into(),
            link: String::new(),
            level: None,
        }
    }

    #[tokio::test]
    async fn records_queries() {
        let catalog = MockCatalog::new(HashMap::from([(
            "health".to_string(),
            vec![course("Anatomy")],
        )]));
        let query = CatalogQuery {
            subject: "health".into(),
            tier: Some(DifficultyTier::Beginner),
        };

        let found = catalog.courses(&query).await.unwrap();
        assert_eq!(found[0].name, "Anatomy");
        assert_eq!(catalog.call_count(), 1);
        assert_eq!(catalog.last_query(), Some(query));
    }

    #[tokio::test]
    async fn unavailable_catalog_fails_externally() {
        let catalog = MockCatalog::unavailable();
        let query = CatalogQuery {
            subject: "health".into(),
            tier: None,
        };
        assert!(catalog.courses(&query).await.unwrap_err().is_external());
    }

    #[tokio::test]
    async fn bank_unknown_subject_is_empty() {
        let bank = MockQuestionBank::new(vec![]);
        assert!(bank.quiz("anything").await.unwrap().is_empty());
        assert_eq!(bank.call_count(), 1);
    }
}
