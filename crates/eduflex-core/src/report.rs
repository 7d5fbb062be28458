//! Quiz reports with JSON persistence and progress summaries.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{DifficultyTier, ScoreResult, StudentProfile};
use crate::traits::QuizOutcome;

/// A saved quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the attempt was graded.
    pub created_at: DateTime<Utc>,
    pub student: StudentProfile,
    pub subject: String,
    /// Raw counts. Absent when a remote backend graded the attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoreResult>,
    pub outcome: QuizOutcome,
}

impl QuizReport {
    pub fn new(
        student: StudentProfile,
        subject: impl Into<String>,
        result: Option<ScoreResult>,
        outcome: QuizOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            student,
            subject: subject.into(),
            result,
            outcome,
        }
    }

    /// File name used when saving into a report directory.
    pub fn file_name(&self) -> String {
        format!(
            "quiz-{}-{}.json",
            self.created_at.format("%Y%m%dT%H%M%S"),
            self.id.simple()
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse report JSON: {}", path.display()))?;
        Ok(report)
    }
}

/// Load every `.json` report in a directory, oldest first. Unreadable files are skipped.
pub fn load_report_dir(dir: &Path) -> Result<Vec<QuizReport>> {
    let mut reports = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read report directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            match QuizReport::load_json(&path) {
                Ok(report) => reports.push(report),
                Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
            }
        }
    }
    reports.sort_by_key(|r| r.created_at);
    Ok(reports)
}

/// Progress in one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProgress {
    pub subject: String,
    pub attempts: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub latest_score: f64,
    pub latest_tier: DifficultyTier,
    /// Latest score minus the one before it, when there are two or more attempts.
    pub trend: Option<f64>,
}

/// One point in the score history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub at: DateTime<Utc>,
    pub subject: String,
    pub score: f64,
}

/// Progress across a set of reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub quizzes_taken: usize,
    pub average_score: f64,
    /// Keyed by subject name.
    pub per_subject: BTreeMap<String, SubjectProgress>,
    /// Every attempt in chronological order.
    pub history: Vec<ScorePoint>,
}

impl ProgressSummary {
    pub fn compute(reports: &[QuizReport]) -> Self {
        let mut ordered: Vec<&QuizReport> = reports.iter().collect();
        ordered.sort_by_key(|r| r.created_at);

        let history: Vec<ScorePoint> = ordered
            .iter()
            .map(|r| ScorePoint {
                at: r.created_at,
                subject: r.subject.clone(),
                score: r.outcome.score,
            })
            .collect();

        let mut by_subject: BTreeMap<String, Vec<&QuizReport>> = BTreeMap::new();
        for r in &ordered {
            by_subject.entry(r.subject.clone()).or_default().push(r);
        }

        let per_subject = by_subject
            .into_iter()
            .filter_map(|(subject, attempts)| {
                let latest = attempts.last()?;
                let scores: Vec<f64> = attempts.iter().map(|r| r.outcome.score).collect();
                let trend = match scores.as_slice() {
                    [.., prev, last] => Some(last - prev),
                    _ => None,
                };
                let progress = SubjectProgress {
                    subject: subject.clone(),
                    attempts: attempts.len(),
                    average_score: mean(&scores),
                    best_score: scores.iter().copied().fold(0.0, f64::max),
                    latest_score: latest.outcome.score,
                    latest_tier: latest.outcome.difficulty,
                    trend,
                };
                Some((subject, progress))
            })
            .collect();

        let all: Vec<f64> = history.iter().map(|p| p.score).collect();
        Self {
            quizzes_taken: history.len(),
            average_score: mean(&all),
            per_subject,
            history,
        }
    }

    /// Format the summary as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} quizzes taken, average score {:.1}%\n\n",
            self.quizzes_taken, self.average_score
        ));

        if !self.per_subject.is_empty() {
            md.push_str("| Subject | Attempts | Average | Best | Latest | Tier | Trend |\n");
            md.push_str("|---------|----------|---------|------|--------|------|-------|\n");
            for p in self.per_subject.values() {
                let trend = p
                    .trend
                    .map(|t| format!("{t:+.1}%"))
                    .unwrap_or_else(|| "-".into());
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {:.1}% | {:.1}% | {} | {} |\n",
                    p.subject,
                    p.attempts,
                    p.average_score,
                    p.best_score,
                    p.latest_score,
                    p.latest_tier,
                    trend
                ));
            }
        }

        md
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
