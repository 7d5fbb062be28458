//! The `eduflex validate` command.

use std::path::PathBuf;

use anyhow::Result;

use eduflex_core::parser::{load_question_bank, parse_catalog, validate_question_bank};
use eduflex_core::traits::QuestionBank;

pub fn execute(bank_path: Option<PathBuf>, catalog_path: Option<PathBuf>) -> Result<()> {
    let mut total_warnings = 0;

    if let Some(path) = bank_path {
        let bank = load_question_bank(&path)?;
        let questions: usize = bank.quizzes().iter().map(|q| q.questions.len()).sum();
        println!(
            "Question bank: {} ({} subjects, {} questions)",
            bank.name(),
            bank.quizzes().len(),
            questions
        );

        let warnings = validate_question_bank(&bank);
        for w in &warnings {
            let prefix = match &w.question_id {
                Some(id) => format!("  [{}/{id}]", w.subject),
                None => format!("  [{}]", w.subject),
            };
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if let Some(path) = catalog_path {
        let catalog = parse_catalog(&path)?;
        println!("Catalog: {} ({} courses)", path.display(), catalog.len());
        for course in catalog.entries() {
            if course.link.trim().is_empty() {
                println!("  [{}] WARNING: course has no link", course.name);
                total_warnings += 1;
            }
            if !(0.0..=5.0).contains(&course.rating) {
                println!(
                    "  [{}] WARNING: rating {} is outside 0..=5",
                    course.name, course.rating
                );
                total_warnings += 1;
            }
        }
    }

    if total_warnings == 0 {
        println!("All files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
