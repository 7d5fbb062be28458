//! The `eduflex analyze` command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use comfy_table::{Cell, Table};

use eduflex_core::parser::parse_gradesheet;
use eduflex_core::traits::{GradesheetAnalysis, GradesheetAnalyzer};
use eduflex_providers::config::{create_backend, create_service, load_config_from};

use crate::commands::tagged_course_table;
use crate::OutputFormat;

pub async fn execute(
    gradesheet: PathBuf,
    threshold: Option<f64>,
    weakest_only: bool,
    remote: bool,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    if let Some(t) = threshold {
        if !(0.0..=100.0).contains(&t) {
            bail!("--threshold must be within 0..=100, got {t}");
        }
    }

    let analysis = if remote {
        let backend = create_backend(&config)?;
        let contents = std::fs::read(&gradesheet)
            .with_context(|| format!("failed to read gradesheet: {}", gradesheet.display()))?;
        let file_name = gradesheet
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gradesheet.csv".to_string());
        eprintln!("Uploading {file_name} to {}", backend.base_url());
        backend.analyze(&file_name, &contents).await?
    } else {
        let scores = parse_gradesheet(&gradesheet)?;
        tracing::debug!(subjects = scores.len(), "gradesheet parsed");
        let cut = if weakest_only {
            None
        } else {
            Some(threshold.unwrap_or(config.weakness_threshold))
        };
        let service = create_service(&config)?.with_weakness_threshold(cut);
        service.analyze_scores(&scores).await?
    };

    match format {
        OutputFormat::Text => print_analysis(&analysis),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
    }
    Ok(())
}

fn print_analysis(analysis: &GradesheetAnalysis) {
    let mut table = Table::new();
    table.set_header(vec!["Weak subject", "Score"]);
    for (subject, score) in analysis.weakest_subjects.iter() {
        table.add_row(vec![Cell::new(subject), Cell::new(format!("{score:.1}%"))]);
    }
    println!("{table}");

    println!("\nRecommended courses:");
    println!(
        "{}",
        tagged_course_table(&analysis.recommendations_based_on_weakness)
    );
}
