//! Collaborator trait definitions.
//!
//! Question banks, course catalogs, gradesheet analysis and quiz submission
//! are reached through these async traits. Local implementations live in this
//! crate; HTTP ones in `eduflex-providers`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::model::{
    AnswerLedger, CourseEntry, DifficultyTier, Question, SubjectWeaknessMap, TaggedCourse,
};

// ---------------------------------------------------------------------------
// Question bank
// ---------------------------------------------------------------------------

/// Source of quiz subjects and question sets.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Human-readable source name (e.g. "local").
    fn name(&self) -> &str;

    /// Subjects that have a quiz.
    async fn subjects(&self) -> CoreResult<Vec<String>>;

    /// Questions for a subject. An unknown subject yields an empty set.
    async fn quiz(&self, subject: &str) -> CoreResult<Vec<Question>>;
}

// ---------------------------------------------------------------------------
// Course catalog
// ---------------------------------------------------------------------------

/// Lookup key for a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub subject: String,
    /// Tier filter, or `None` to query by subject alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<DifficultyTier>,
}

/// Read-only source of course entries.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the catalog can filter by difficulty tier.
    fn supports_tiers(&self) -> bool {
        true
    }

    /// Courses matching the query, in the catalog's own order.
    async fn courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseEntry>>;
}

// ---------------------------------------------------------------------------
// Gradesheet analysis
// ---------------------------------------------------------------------------

/// Result of analyzing a gradesheet: weak subjects and courses for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradesheetAnalysis {
    pub weakest_subjects: SubjectWeaknessMap,
    pub recommendations_based_on_weakness: Vec<TaggedCourse>,
}

/// Anything that turns an uploaded gradesheet into weakness-based recommendations.
#[async_trait]
pub trait GradesheetAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, file_name: &str, contents: &[u8]) -> CoreResult<GradesheetAnalysis>;
}

// ---------------------------------------------------------------------------
// Quiz submission
// ---------------------------------------------------------------------------

/// A completed quiz attempt sent for grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub name: String,
    pub age: u32,
    pub subject: String,
    pub answers: AnswerLedger,
}

/// What a graded attempt returns to the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Percentage score.
    pub score: f64,
    pub difficulty: DifficultyTier,
    #[serde(default)]
    pub recommended_courses: Vec<CourseEntry>,
}

/// Anything that can grade a quiz attempt: the local service or a remote backend.
#[async_trait]
pub trait QuizSubmitter: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, request: &SubmitRequest) -> CoreResult<QuizOutcome>;
}
