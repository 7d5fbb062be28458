//! Quiz scoring.

use crate::error::{CoreError, CoreResult};
use crate::model::{labels_match, AnswerLedger, Question, ScoreResult};

/// Score an attempt against the answer keys of `questions`.
///
/// Unanswered questions count as incorrect. Ledger entries for indices past
/// the end of `questions` are ignored. Fails when the question set is absent
/// or a question carries no answer key.
pub fn score(questions: Option<&[Question]>, answers: &AnswerLedger) -> CoreResult<ScoreResult> {
    let questions = questions.ok_or_else(|| CoreError::invalid("question set is missing"))?;

    let mut correct_count = 0usize;
    for (i, question) in questions.iter().enumerate() {
        let key = question.correct_label.as_deref().ok_or_else(|| {
            CoreError::invalid(format!("question {i} ({}) has no answer key", question.id))
        })?;

        match answers.selected(i) {
            Some(selected) => {
                let correct = labels_match(selected, key);
                tracing::debug!(question = i, key, selected, correct, "checked answer");
                if correct {
                    correct_count += 1;
                }
            }
            None => tracing::debug!(question = i, "no answer provided"),
        }
    }

    let total_count = questions.len();
    Ok(ScoreResult {
        correct_count,
        total_count,
        percentage: percentage(correct_count, total_count),
    })
}

/// `correct / total * 100`, defined as 0 for an empty quiz.
pub fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}
