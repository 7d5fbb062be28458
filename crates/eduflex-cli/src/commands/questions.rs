//! The `eduflex questions` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use eduflex_core::bank::LocalQuestionBank;
use eduflex_core::parser::{load_question_bank, starter_question_bank};
use eduflex_core::traits::QuestionBank;
use eduflex_providers::config::{load_config_from, QuestionBankConfig};

pub fn execute(
    search: Option<String>,
    subject: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank: LocalQuestionBank = match &config.question_bank {
        QuestionBankConfig::Local { path: Some(path) } => load_question_bank(path)?,
        QuestionBankConfig::Local { path: None } => starter_question_bank()?,
        _ => bail!("question search needs a local question bank"),
    };

    let mut table = Table::new();
    table.set_header(vec!["Subject", "#", "Question"]);

    let count = match (&search, &subject) {
        (Some(needle), _) => {
            let hits = bank.search(needle);
            for hit in &hits {
                table.add_row(vec![
                    Cell::new(hit.subject),
                    Cell::new(hit.index),
                    Cell::new(&hit.question.prompt),
                ]);
            }
            hits.len()
        }
        (None, Some(subject)) => {
            let Some(quiz) = bank.find(subject) else {
                bail!("no quiz for subject '{}'", subject.trim());
            };
            for (index, question) in quiz.questions.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(&quiz.subject),
                    Cell::new(index),
                    Cell::new(&question.prompt),
                ]);
            }
            quiz.questions.len()
        }
        (None, None) => {
            println!("Question bank: {}", bank.name());
            for quiz in bank.quizzes() {
                println!("  {} ({} questions)", quiz.subject, quiz.questions.len());
            }
            return Ok(());
        }
    };

    if count == 0 {
        println!("No questions found.");
    } else {
        println!("{table}");
    }
    Ok(())
}
