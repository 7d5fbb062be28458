//! The `eduflex progress` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use eduflex_core::report::{load_report_dir, ProgressSummary};
use eduflex_providers::config::load_config_from;

use crate::ProgressFormat;

pub fn execute(
    dir: Option<PathBuf>,
    format: ProgressFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => load_config_from(config_path.as_deref())?.output_dir,
    };

    let reports = if dir.exists() {
        load_report_dir(&dir)?
    } else {
        Vec::new()
    };
    if reports.is_empty() {
        println!("No quiz reports found in {}.", dir.display());
        return Ok(());
    }

    let summary = ProgressSummary::compute(&reports);
    match format {
        ProgressFormat::Markdown => print!("{}", summary.to_markdown()),
        ProgressFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        ProgressFormat::Text => print_summary(&summary),
    }
    Ok(())
}

fn print_summary(summary: &ProgressSummary) {
    println!(
        "{} quizzes taken, average score {:.1}%",
        summary.quizzes_taken, summary.average_score
    );

    let mut table = Table::new();
    table.set_header(vec![
        "Subject", "Attempts", "Average", "Best", "Latest", "Tier", "Trend",
    ]);
    for p in summary.per_subject.values() {
        table.add_row(vec![
            Cell::new(&p.subject),
            Cell::new(p.attempts),
            Cell::new(format!("{:.1}%", p.average_score)),
            Cell::new(format!("{:.1}%", p.best_score)),
            Cell::new(format!("{:.1}%", p.latest_score)),
            Cell::new(p.latest_tier),
            Cell::new(
                p.trend
                    .map(|t| format!("{t:+.1}%"))
                    .unwrap_or_else(|| "-".into()),
            ),
        ]);
    }
    println!("{table}");

    if let Some(last) = summary.history.last() {
        println!(
            "Last quiz: {} on {}",
            last.subject,
            last.at.format("%Y-%m-%d %H:%M UTC")
        );
    }
}
