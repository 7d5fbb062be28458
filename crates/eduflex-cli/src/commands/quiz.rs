//! The `eduflex quiz` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use eduflex_core::model::{ScoreResult, StudentProfile};
use eduflex_core::report::QuizReport;
use eduflex_core::session::QuizSession;
use eduflex_core::traits::QuizOutcome;
use eduflex_providers::config::{create_backend, create_service, load_config_from};

use crate::commands::course_table;
use crate::OutputFormat;

pub struct QuizArgs {
    pub subject: String,
    pub name: String,
    pub age: u32,
    pub answers: Option<String>,
    pub remote: bool,
    pub save: bool,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: QuizArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let mut session = QuizSession::new();
    session.set_profile(&args.name, args.age)?;

    let (result, outcome) = if args.remote {
        let backend = create_backend(&config)?;
        eprintln!("Grading with quiz backend at {}", backend.base_url());
        session.choose_subject(&args.subject, &backend).await?;
        collect_answers(&mut session, args.answers.as_deref())?;
        let outcome = session.submit(&backend).await?.clone();
        (None, outcome)
    } else {
        let service = create_service(&config)?;
        let questions = service.quiz(&args.subject).await?;
        tracing::debug!(bank = service.bank().name(), count = questions.len(), "quiz loaded");
        session.begin(&args.subject, questions)?;
        collect_answers(&mut session, args.answers.as_deref())?;
        let graded = session.submit_graded(&service).await?;
        (Some(graded.result), graded.outcome)
    };

    let profile = StudentProfile {
        name: args.name.trim().to_string(),
        age: args.age,
    };
    let report = QuizReport::new(profile, args.subject.trim(), result, outcome);

    match args.format {
        OutputFormat::Text => print_outcome(&report.subject, result.as_ref(), &report.outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if args.save {
        let dir = args.output.unwrap_or(config.output_dir);
        let path = dir.join(report.file_name());
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

/// Record answers from `--answers`, or ask for them on stdin.
fn collect_answers(session: &mut QuizSession, answers: Option<&str>) -> Result<()> {
    if session.questions().is_empty() {
        bail!(
            "no questions available for subject '{}'",
            session.subject().unwrap_or_default()
        );
    }

    match answers {
        Some(pairs) => {
            for (index, label) in parse_answers(pairs)? {
                session.answer(index, &label)?;
            }
        }
        None => prompt_answers(session)?,
    }
    Ok(())
}

/// Parse `"0=A,1=C"` into `(question index, label)` pairs.
fn parse_answers(pairs: &str) -> Result<Vec<(usize, String)>> {
    pairs
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (index, label) = pair
                .split_once('=')
                .with_context(|| format!("expected INDEX=LABEL, got '{pair}'"))?;
            let index = index
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid question index in '{pair}'"))?;
            Ok((index, label.trim().to_string()))
        })
        .collect()
}

fn prompt_answers(session: &mut QuizSession) -> Result<()> {
    let questions = session.questions().to_vec();
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    println!(
        "{} questions on {}. Enter an option label, or leave blank to skip.",
        questions.len(),
        session.subject().unwrap_or_default()
    );

    for (index, question) in questions.iter().enumerate() {
        println!("\n{}. {}", index + 1, question.prompt);
        for option in &question.options {
            println!("   {option}");
        }

        loop {
            print!("> ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line?;
            let choice = line.trim();
            if choice.is_empty() {
                break;
            }
            match session.answer(index, choice) {
                Ok(()) => break,
                Err(e) => println!("{e}"),
            }
        }
    }
    Ok(())
}

fn print_outcome(subject: &str, result: Option<&ScoreResult>, outcome: &QuizOutcome) {
    match result {
        Some(r) => println!(
            "Score: {:.1}% ({}/{} correct)",
            outcome.score, r.correct_count, r.total_count
        ),
        None => println!("Score: {:.1}%", outcome.score),
    }
    println!("Difficulty: {}", outcome.difficulty);
    println!("\nRecommended {} courses:", subject);
    println!("{}", course_table(&outcome.recommended_courses));
}
