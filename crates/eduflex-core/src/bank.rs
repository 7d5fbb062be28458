//! In-memory question bank.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::model::Question;
use crate::traits::QuestionBank;

/// The questions of one subject.
#[derive(Debug, Clone)]
pub struct SubjectQuiz {
    pub subject: String,
    pub questions: Vec<Question>,
}

/// A question bank held in memory, usually loaded from TOML.
#[derive(Debug, Clone)]
pub struct LocalQuestionBank {
    name: String,
    quizzes: Vec<SubjectQuiz>,
}

/// A question matched by [`LocalQuestionBank::search`].
#[derive(Debug, Clone)]
pub struct QuestionHit<'a> {
    pub subject: &'a str,
    pub index: usize,
    pub question: &'a Question,
}

impl LocalQuestionBank {
    pub fn new(name: impl Into<String>, quizzes: Vec<SubjectQuiz>) -> Self {
        Self {
            name: name.into(),
            quizzes,
        }
    }

    /// Merge several banks; later subjects with the same name replace earlier ones.
    pub fn merged(name: impl Into<String>, banks: Vec<LocalQuestionBank>) -> Self {
        let mut quizzes: Vec<SubjectQuiz> = Vec::new();
        for quiz in banks.into_iter().flat_map(|b| b.quizzes) {
            match quizzes.iter_mut().find(|q| q.subject == quiz.subject) {
                Some(existing) => *existing = quiz,
                None => quizzes.push(quiz),
            }
        }
        Self::new(name, quizzes)
    }

    pub fn quizzes(&self) -> &[SubjectQuiz] {
        &self.quizzes
    }

    /// Find a subject by name, ignoring case and surrounding whitespace.
    pub fn find(&self, subject: &str) -> Option<&SubjectQuiz> {
        let wanted = subject.trim();
        self.quizzes
            .iter()
            .find(|q| q.subject.eq_ignore_ascii_case(wanted))
    }

    /// Questions whose text contains `needle` (case-insensitive), across all subjects.
    pub fn search(&self, needle: &str) -> Vec<QuestionHit<'_>> {
        let needle = needle.to_lowercase();
        self.quizzes
            .iter()
            .flat_map(|quiz| {
                quiz.questions
                    .iter()
                    .enumerate()
                    .map(move |(index, question)| QuestionHit {
                        subject: quiz.subject.as_str(),
                        index,
                        question,
                    })
            })
            .filter(|hit| hit.question.prompt.to_lowercase().contains(&needle))
            .collect()
    }
}

#[async_trait]
impl QuestionBank for LocalQuestionBank {
    fn name(&self) -> &str {
        &self.name
    }

    async fn subjects(&self) -> CoreResult<Vec<String>> {
        Ok(self.quizzes.iter().map(|q| q.subject.clone()).collect())
    }

    async fn quiz(&self, subject: &str) -> CoreResult<Vec<Question>> {
        match self.find(subject) {
            Some(quiz) => Ok(quiz.questions.clone()),
            None => {
                tracing::warn!(bank = %self.name, subject, "no quiz available for subject");
                Ok(Vec::new())
            }
        }
    }
}
