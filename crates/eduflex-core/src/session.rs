//! Interactive quiz session.
//!
//! A session moves `CollectingProfile -> SelectingSubject -> Answering -> Scored`.
//! Choosing another subject while answering starts that subject over with an
//! empty ledger. Scoring happens only on an explicit [`QuizSession::submit`]
//! or [`QuizSession::submit_graded`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::model::{AnswerLedger, Question, StudentProfile};
use crate::service::{GradedAttempt, QuizService};
use crate::traits::{QuestionBank, QuizOutcome, QuizSubmitter, SubmitRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    CollectingProfile,
    SelectingSubject,
    Answering,
    Scored,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::CollectingProfile => "collecting profile",
            SessionState::SelectingSubject => "selecting subject",
            SessionState::Answering => "answering",
            SessionState::Scored => "scored",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    state: SessionState,
    profile: Option<StudentProfile>,
    subject: Option<String>,
    questions: Vec<Question>,
    answers: AnswerLedger,
    outcome: Option<QuizOutcome>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::CollectingProfile,
            profile: None,
            subject: None,
            questions: Vec::new(),
            answers: AnswerLedger::new(),
            outcome: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn profile(&self) -> Option<&StudentProfile> {
        self.profile.as_ref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerLedger {
        &self.answers
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    fn expect_state(&self, allowed: &[SessionState], action: &str) -> CoreResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(CoreError::invalid(format!(
                "cannot {action} while {}",
                self.state
            )))
        }
    }

    /// Record who is taking the quiz.
    pub fn set_profile(&mut self, name: &str, age: u32) -> CoreResult<()> {
        self.expect_state(&[SessionState::CollectingProfile], "set the profile")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::invalid("student name is required"));
        }
        if age == 0 {
            return Err(CoreError::invalid("student age must be positive"));
        }
        self.profile = Some(StudentProfile {
            name: name.to_string(),
            age,
        });
        self.state = SessionState::SelectingSubject;
        Ok(())
    }

    /// Start (or restart) a subject with an already fetched question set.
    pub fn begin(&mut self, subject: &str, questions: Vec<Question>) -> CoreResult<()> {
        self.expect_state(
            &[SessionState::SelectingSubject, SessionState::Answering],
            "choose a subject",
        )?;
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(CoreError::invalid("subject is required"));
        }
        if self.state == SessionState::Answering {
            tracing::debug!(from = ?self.subject, to = subject, "subject changed, resetting answers");
        }
        self.subject = Some(subject.to_string());
        self.questions = questions;
        self.answers.clear();
        self.state = SessionState::Answering;
        Ok(())
    }

    /// Fetch the subject's questions from `bank` and start answering.
    pub async fn choose_subject(&mut self, subject: &str, bank: &dyn QuestionBank) -> CoreResult<()> {
        self.expect_state(
            &[SessionState::SelectingSubject, SessionState::Answering],
            "choose a subject",
        )?;
        let questions = bank.quiz(subject.trim()).await?;
        self.begin(subject, questions)
    }

    /// Select an option for the question at `index`, replacing any earlier choice.
    pub fn answer(&mut self, index: usize, label: &str) -> CoreResult<()> {
        self.expect_state(&[SessionState::Answering], "answer")?;
        let question = self.questions.get(index).ok_or_else(|| {
            CoreError::invalid(format!(
                "question {index} does not exist (quiz has {} questions)",
                self.questions.len()
            ))
        })?;
        if !question.has_option(label) {
            return Err(CoreError::invalid(format!(
                "'{}' is not an option for question {index}",
                label.trim()
            )));
        }
        self.answers.record(index, label.trim());
        Ok(())
    }

    /// The request this session would submit.
    pub fn request(&self) -> CoreResult<SubmitRequest> {
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| CoreError::invalid("no student profile"))?;
        let subject = self
            .subject
            .clone()
            .ok_or_else(|| CoreError::invalid("no subject chosen"))?;
        Ok(SubmitRequest {
            name: profile.name.clone(),
            age: profile.age,
            subject,
            answers: self.answers.clone(),
        })
    }

    /// Send the answers for grading. The session is `Scored` only on success.
    pub async fn submit(&mut self, submitter: &dyn QuizSubmitter) -> CoreResult<&QuizOutcome> {
        self.expect_state(&[SessionState::Answering], "submit")?;
        let request = self.request()?;
        let outcome = submitter.submit(&request).await?;
        self.state = SessionState::Scored;
        let outcome = self.outcome.insert(outcome);
        Ok(&*outcome)
    }

    /// Grade locally, keeping the raw counts. Moves to `Scored` like [`submit`](Self::submit).
    pub async fn submit_graded(&mut self, service: &QuizService) -> CoreResult<GradedAttempt> {
        self.expect_state(&[SessionState::Answering], "submit")?;
        let graded = service.grade(&self.request()?).await?;
        self.state = SessionState::Scored;
        self.outcome = Some(graded.outcome.clone());
        Ok(graded)
    }

    /// Go back to subject selection after a scored attempt, keeping the profile.
    pub fn restart(&mut self) -> CoreResult<()> {
        self.expect_state(&[SessionState::Scored], "restart")?;
        self.subject = None;
        self.questions.clear();
        self.answers.clear();
        self.outcome = None;
        self.state = SessionState::SelectingSubject;
        Ok(())
    }
}
