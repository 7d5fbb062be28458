//! The quiz service: scores attempts, classifies them and recommends courses.
//!
//! This is the only place a submission is graded. The CLI, sessions and the
//! gradesheet path all go through it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::difficulty::{DifficultyPolicy, ScoreBands};
use crate::error::{CoreError, CoreResult};
use crate::model::{AnswerLedger, DifficultyTier, Question, ScoreResult, SubjectWeaknessMap};
use crate::recommend::recommend;
use crate::scoring::score;
use crate::traits::{
    CourseCatalog, GradesheetAnalysis, GradesheetAnalyzer, QuestionBank, QuizOutcome,
    QuizSubmitter, SubmitRequest,
};
use crate::weakness::{analyze_gradesheet, DEFAULT_WEAKNESS_THRESHOLD};

impl SubmitRequest {
    /// Reject requests the backend would refuse before grading.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid("student name is required"));
        }
        if self.age == 0 {
            return Err(CoreError::invalid("student age must be positive"));
        }
        if self.subject.trim().is_empty() {
            return Err(CoreError::invalid("subject is required"));
        }
        if self.answers.is_empty() {
            return Err(CoreError::empty("no answers were submitted"));
        }
        Ok(())
    }
}

/// Score plus tier for one attempt, before any catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub result: ScoreResult,
    pub difficulty: DifficultyTier,
}

/// A graded submission with the raw counts kept alongside the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAttempt {
    pub result: ScoreResult,
    pub outcome: QuizOutcome,
}

pub struct QuizService {
    bank: Arc<dyn QuestionBank>,
    catalog: Arc<dyn CourseCatalog>,
    policy: Arc<dyn DifficultyPolicy>,
    weakness_threshold: Option<f64>,
}

impl QuizService {
    pub fn new(bank: Arc<dyn QuestionBank>, catalog: Arc<dyn CourseCatalog>) -> Self {
        Self {
            bank,
            catalog,
            policy: Arc::new(ScoreBands::default()),
            weakness_threshold: Some(DEFAULT_WEAKNESS_THRESHOLD),
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn DifficultyPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Set the weakness cut. `None` means "weakest subjects only".
    pub fn with_weakness_threshold(mut self, threshold: Option<f64>) -> Self {
        self.weakness_threshold = threshold;
        self
    }

    pub fn bank(&self) -> &dyn QuestionBank {
        self.bank.as_ref()
    }

    pub fn catalog(&self) -> &dyn CourseCatalog {
        self.catalog.as_ref()
    }

    pub async fn subjects(&self) -> CoreResult<Vec<String>> {
        self.bank.subjects().await
    }

    /// Questions for a subject with answer keys removed, ready to show a student.
    pub async fn quiz(&self, subject: &str) -> CoreResult<Vec<Question>> {
        let questions = self.bank.quiz(subject).await?;
        Ok(questions.iter().map(Question::without_answer).collect())
    }

    /// Score and classify answers against a known question set.
    pub fn evaluate(
        &self,
        questions: &[Question],
        answers: &AnswerLedger,
        age: Option<u32>,
    ) -> CoreResult<Evaluation> {
        let result = score(Some(questions), answers)?;
        let difficulty = self.policy.classify(result.percentage, age);
        Ok(Evaluation { result, difficulty })
    }

    /// Grade a submission end to end: validate, score, classify, recommend.
    pub async fn grade(&self, request: &SubmitRequest) -> CoreResult<GradedAttempt> {
        request.validate()?;
        let subject = request.subject.trim();
        tracing::info!(
            student = %request.name,
            subject,
            answered = request.answers.len(),
            "quiz submission received"
        );

        let questions = self.bank.quiz(subject).await?;
        request.answers.validate_against(questions.len())?;

        let Evaluation { result, difficulty } =
            self.evaluate(&questions, &request.answers, Some(request.age))?;
        let recommended_courses = recommend(subject, difficulty, self.catalog.as_ref()).await?;

        tracing::info!(
            subject,
            score = result.percentage,
            %difficulty,
            recommended = recommended_courses.len(),
            "quiz graded"
        );

        Ok(GradedAttempt {
            result,
            outcome: QuizOutcome {
                score: result.percentage,
                difficulty,
                recommended_courses,
            },
        })
    }

    /// Weak subjects of a gradesheet and courses for each.
    pub async fn analyze_scores(&self, scores: &SubjectWeaknessMap) -> CoreResult<GradesheetAnalysis> {
        analyze_gradesheet(
            scores,
            self.weakness_threshold,
            self.policy.as_ref(),
            self.catalog.as_ref(),
        )
        .await
    }
}

#[async_trait]
impl QuizSubmitter for QuizService {
    fn name(&self) -> &str {
        "local"
    }

    async fn submit(&self, request: &SubmitRequest) -> CoreResult<QuizOutcome> {
        self.grade(request).await.map(|graded| graded.outcome)
    }
}

#[async_trait]
impl GradesheetAnalyzer for QuizService {
    fn name(&self) -> &str {
        self.catalog.name()
    }

    async fn analyze(&self, file_name: &str, contents: &[u8]) -> CoreResult<GradesheetAnalysis> {
        let scores = crate::parser::parse_gradesheet_bytes(file_name, contents)
            .map_err(|e| CoreError::invalid(format!("{e:#}")))?;
        self.analyze_scores(&scores).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{LocalQuestionBank, SubjectQuiz};
    use crate::model::{CourseEntry, QuizOption};
    use crate::traits::CatalogQuery;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCatalog {
        seen: Mutex<Vec<CatalogQuery>>,
    }

    #[async_trait]
    impl CourseCatalog for RecordingCatalog {
        fn name(&self) -> &str {
            "recording"
        }

        async fn courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseEntry>> {
            self.seen.lock().unwrap().push(query.clone());
            Ok(vec![CourseEntry {
                name: "Foundations of Sociology".into(),
                rating: 4.4,
                category: query.subject.clone(),
                link: "https://courses.example/sociology".into(),
                level: query.tier.map(|t| t.to_string()),
            }])
        }
    }

    fn ten_question_bank() -> LocalQuestionBank {
        let questions = (0..10)
            .map(|i| Question {
                id: format!("ss-{i}"),
                subject_id: "Social Sciences".into(),
                prompt: format!("Question {i}"),
                options: vec![QuizOption::new("A", "right"), QuizOption::new("B", "wrong")],
                correct_label: Some("A".into()),
            })
            .collect();
        LocalQuestionBank::new(
            "ten questions",
            vec![SubjectQuiz {
                subject: "Social Sciences".into(),
                questions,
            }],
        )
    }

    fn service() -> (QuizService, Arc<RecordingCatalog>) {
        let catalog = Arc::new(RecordingCatalog::default());
        let service = QuizService::new(Arc::new(ten_question_bank()), catalog.clone());
        (service, catalog)
    }

    fn request(answers: AnswerLedger) -> SubmitRequest {
        SubmitRequest {
            name: "Asha".into(),
            age: 17,
            subject: "Social Sciences".into(),
            answers,
        }
    }

    #[tokio::test]
    async fn eight_of_ten_is_advanced_and_queries_catalog() {
        let (service, catalog) = service();
        let answers: AnswerLedger = (0..10)
            .map(|i| (i, if i < 8 { "A" } else { "B" }))
            .collect();

        let graded = service.grade(&request(answers)).await.unwrap();
        assert_eq!(graded.result.correct_count, 8);
        assert_eq!(graded.outcome.score, 80.0);
        assert_eq!(graded.outcome.difficulty, DifficultyTier::Advanced);
        assert_eq!(graded.outcome.recommended_courses.len(), 1);

        let seen = catalog.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![CatalogQuery {
                subject: "Social Sciences".into(),
                tier: Some(DifficultyTier::Advanced),
            }]
        );
    }

    #[tokio::test]
    async fn submit_trait_returns_outcome() {
        let (service, _) = service();
        let answers: AnswerLedger = [(0, "a"), (1, "A")].into_iter().collect();
        let outcome = service.submit(&request(answers)).await.unwrap();
        assert_eq!(outcome.score, 20.0);
        assert_eq!(outcome.difficulty, DifficultyTier::Beginner);
    }

    #[test]
    fn local_grader_is_named_local() {
        let (service, _) = service();
        assert_eq!(QuizSubmitter::name(&service), "local");
        assert_eq!(GradesheetAnalyzer::name(&service), "recording");
    }

    #[tokio::test]
    async fn rejects_incomplete_requests() {
        let (service, catalog) = service();
        let one: AnswerLedger = [(0, "A")].into_iter().collect();

        let mut req = request(one.clone());
        req.name = "  ".into();
        assert!(matches!(service.grade(&req).await, Err(CoreError::InvalidInput(_))));

        let mut req = request(one.clone());
        req.age = 0;
        assert!(matches!(service.grade(&req).await, Err(CoreError::InvalidInput(_))));

        let mut req = request(one);
        req.subject = String::new();
        assert!(matches!(service.grade(&req).await, Err(CoreError::InvalidInput(_))));

        let req = request(AnswerLedger::new());
        assert!(matches!(service.grade(&req).await, Err(CoreError::EmptyInput(_))));

        assert!(catalog.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_answer_is_invalid() {
        let (service, _) = service();
        let answers: AnswerLedger = [(10, "A")].into_iter().collect();
        let err = service.grade(&request(answers)).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn quiz_hides_answer_keys() {
        let (service, _) = service();
        let questions = service.quiz("Social Sciences").await.unwrap();
        assert_eq!(questions.len(), 10);
        assert!(questions.iter().all(|q| q.correct_label.is_none()));
    }

    #[tokio::test]
    async fn custom_policy_is_used() {
        let (service, _) = service();
        let service = service.with_policy(Arc::new(ScoreBands::new(20.0, 90.0).unwrap()));
        let answers: AnswerLedger = (0..8).map(|i| (i, "A")).collect();
        let outcome = service.submit(&request(answers)).await.unwrap();
        assert_eq!(outcome.difficulty, DifficultyTier::Intermediate);
    }

    #[tokio::test]
    async fn analyzes_uploaded_gradesheet() {
        let (service, catalog) = service();
        let csv = b"subject,score\nMath,90\nPhysics,40\nChem,85\n";
        let analysis = service.analyze("grades.csv", csv).await.unwrap();
        assert_eq!(analysis.weakest_subjects.get("Physics"), Some(40.0));
        assert_eq!(analysis.weakest_subjects.len(), 1);
        assert_eq!(analysis.recommendations_based_on_weakness[0].subject, "Physics");
        assert_eq!(
            catalog.seen.lock().unwrap()[0].tier,
            Some(DifficultyTier::Beginner)
        );
    }

    #[tokio::test]
    async fn unreadable_gradesheet_is_invalid_input() {
        let (service, _) = service();
        let err = service.analyze("grades.csv", b"Math;ninety").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
