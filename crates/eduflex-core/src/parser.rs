//! File loaders for question banks, course catalogs and gradesheets.
//!
//! Question banks and catalogs are TOML; gradesheets are CSV (`subject,score`)
//! or a JSON object of subject scores.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::{LocalQuestionBank, SubjectQuiz};
use crate::catalog::LocalCatalog;
use crate::model::{CourseEntry, Question, SubjectWeaknessMap};

// ---------------------------------------------------------------------------
// Question banks
// ---------------------------------------------------------------------------

/// Intermediate TOML structure for question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    subjects: Vec<TomlSubject>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    #[allow(dead_code)]
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlSubject {
    name: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    id: Option<String>,
    prompt: String,
    /// Either `"A) text"` strings or bare texts labelled by position.
    options: Vec<String>,
    /// Option label, or the full text of the correct option.
    answer: String,
}

/// Parse a single question bank file.
pub fn parse_question_bank(path: &Path) -> Result<LocalQuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a question bank from a TOML string (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<LocalQuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let quizzes = parsed
        .subjects
        .into_iter()
        .map(|subject| {
            let slug = crate::subjects::path_key(&subject.name);
            let questions = subject
                .questions
                .into_iter()
                .enumerate()
                .map(|(i, q)| {
                    Question::from_wire(
                        q.id.unwrap_or_else(|| format!("{slug}-{}", i + 1)),
                        subject.name.as_str(),
                        &q.prompt,
                        &q.options,
                        Some(q.answer.as_str()),
                    )
                })
                .collect();
            SubjectQuiz {
                subject: subject.name,
                questions,
            }
        })
        .collect();

    Ok(LocalQuestionBank::new(parsed.bank.name, quizzes))
}

/// Recursively load all `.toml` question banks from a directory and merge them.
pub fn load_bank_directory(dir: &Path) -> Result<LocalQuestionBank> {
    let mut banks = Vec::new();
    collect_banks(dir, &mut banks)?;
    Ok(LocalQuestionBank::merged(dir.display().to_string(), banks))
}

fn collect_banks(dir: &Path, banks: &mut Vec<LocalQuestionBank>) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_banks(&path, banks)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}

/// Load a question bank from a file or a directory of files.
pub fn load_question_bank(path: &Path) -> Result<LocalQuestionBank> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        parse_question_bank(path)
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Subject the warning belongs to.
    pub subject: String,
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_question_bank(bank: &LocalQuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for quiz in bank.quizzes() {
        let warn = |question: Option<&Question>, message: String| ValidationWarning {
            subject: quiz.subject.clone(),
            question_id: question.map(|q| q.id.clone()),
            message,
        };

        if quiz.questions.is_empty() {
            warnings.push(warn(None, "subject has no questions".into()));
        }

        let mut seen_ids = HashSet::new();
        for question in &quiz.questions {
            if !seen_ids.insert(&question.id) {
                warnings.push(warn(
                    Some(question),
                    format!("duplicate question ID: {}", question.id),
                ));
            }

            if question.prompt.trim().is_empty() {
                warnings.push(warn(Some(question), "prompt is empty".into()));
            }

            if question.options.len() < 2 {
                warnings.push(warn(Some(question), "fewer than two options".into()));
            }

            match question.correct_label.as_deref() {
                None => warnings.push(warn(Some(question), "no answer key".into())),
                Some(label) if !question.has_option(label) => warnings.push(warn(
                    Some(question),
                    format!("answer '{label}' does not match any option label"),
                )),
                Some(_) => {}
            }
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Course catalogs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    courses: Vec<CourseEntry>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    name: String,
}

/// Parse a course catalog file.
pub fn parse_catalog(path: &Path) -> Result<LocalCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a course catalog from a TOML string.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<LocalCatalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(LocalCatalog::new(parsed.catalog.name, parsed.courses))
}

// ---------------------------------------------------------------------------
// Gradesheets
// ---------------------------------------------------------------------------

/// Parse a gradesheet file, choosing the format from its extension.
pub fn parse_gradesheet(path: &Path) -> Result<SubjectWeaknessMap> {
    let content = std::fs::read(path)
        .with_context(|| format!("failed to read gradesheet: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    parse_gradesheet_bytes(&name, &content)
}

/// Parse gradesheet contents. JSON is used for `.json` names or content that
/// starts with `{`; everything else is read as CSV.
pub fn parse_gradesheet_bytes(file_name: &str, contents: &[u8]) -> Result<SubjectWeaknessMap> {
    let text = std::str::from_utf8(contents)
        .with_context(|| format!("gradesheet {file_name} is not valid UTF-8"))?;

    if file_name.to_lowercase().ends_with(".json") || text.trim_start().starts_with('{') {
        let map: SubjectWeaknessMap = serde_json::from_str(text)
            .with_context(|| format!("failed to parse gradesheet JSON: {file_name}"))?;
        Ok(map)
    } else {
        parse_gradesheet_csv(text).with_context(|| format!("failed to parse gradesheet: {file_name}"))
    }
}

/// Score column names accepted in a header row.
const SCORE_HEADERS: &[&str] = &[
    "score", "scores", "mark", "marks", "grade", "grades", "percentage", "percent", "result",
];

/// Parse `subject,score` rows. The first row may be a header naming the score
/// column; blank lines and `#` comments are skipped.
pub fn parse_gradesheet_csv(text: &str) -> Result<SubjectWeaknessMap> {
    let mut map = SubjectWeaknessMap::new();
    let mut first_row = true;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((subject, score)) = line.rsplit_once(',') else {
            anyhow::bail!("line {}: expected `subject,score`", line_no + 1);
        };
        let subject = subject.trim().trim_matches('"');
        let score = score.trim().trim_matches('"').trim_end_matches('%');

        match score.parse::<f64>() {
            Ok(value) => map.insert(subject, value).map_err(|e| {
                anyhow::anyhow!("line {}: {e}", line_no + 1)
            })?,
            Err(_) if first_row && SCORE_HEADERS.contains(&score.to_lowercase().as_str()) => {}
            Err(_) => anyhow::bail!("line {}: score '{score}' is not a number", line_no + 1),
        }
        first_row = false;
    }

    Ok(map)
}

/// Example questions used when no bank is configured.
pub fn starter_question_bank() -> Result<LocalQuestionBank> {
    parse_question_bank_str(STARTER_BANK, Path::new("starter-bank.toml"))
}

/// Example catalog used when no catalog is configured.
pub fn starter_catalog() -> Result<LocalCatalog> {
    parse_catalog_str(STARTER_CATALOG, Path::new("starter-catalog.toml"))
}

pub const STARTER_BANK: &str = include_str!("../data/starter-bank.toml");
pub const STARTER_CATALOG: &str = include_str!("../data/starter-catalog.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::QuestionBank;
    use std::path::PathBuf;

    const VALID_BANK: &str = r#"
[bank]
id = "test-bank"
name = "Test Bank"

[[subjects]]
name = "Data Science"

[[subjects.questions]]
prompt = "What is the most commonly used library for data visualization in Python?"
options = ["A) Pandas", "B) Matplotlib", "C) NumPy", "D) Seaborn"]
answer = "B"

[[subjects.questions]]
id = "ds-custom"
prompt = "Which of these is used for supervised learning?"
options = ["K-Means", "Linear Regression", "DBSCAN", "Apriori"]
answer = "Linear Regression"
"#;

    #[test]
    fn parse_valid_bank() {
        let bank = parse_question_bank_str(VALID_BANK, &PathBuf::from("test.toml")).unwrap();
        let quiz = bank.find("Data Science").unwrap();
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].id, "datascience-1");
        assert_eq!(quiz.questions[0].options[1].text, "Matplotlib");
        assert_eq!(quiz.questions[0].correct_label.as_deref(), Some("B"));
        assert_eq!(quiz.questions[1].id, "ds-custom");
        assert_eq!(quiz.questions[1].correct_label.as_deref(), Some("B"));
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_flags_bad_answers_and_duplicates() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[subjects]]
name = "Business"

[[subjects.questions]]
id = "same"
prompt = "What is ROI?"
options = ["A) Return on Investment", "B) Risk of Inflation"]
answer = "E"

[[subjects.questions]]
id = "same"
prompt = "  "
options = ["only one"]
answer = "A"

[[subjects]]
name = "Empty"
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("bad.toml")).unwrap();
        let warnings = validate_question_bank(&bank);
        let messages: Vec<_> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("does not match")));
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("prompt is empty")));
        assert!(messages.iter().any(|m| m.contains("fewer than two")));
        assert!(messages.iter().any(|m| m.contains("no questions")));
    }

    #[tokio::test]
    async fn load_directory_merges_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_BANK).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [toml").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let bank = load_question_bank(dir.path()).unwrap();
        assert_eq!(bank.subjects().await.unwrap(), vec!["Data Science"]);
    }

    #[test]
    fn load_missing_directory_fails() {
        assert!(load_bank_directory(Path::new("/definitely/not/here")).is_err());
    }

    #[test]
    fn starter_data_is_valid() {
        let bank = starter_question_bank().unwrap();
        assert!(validate_question_bank(&bank).is_empty());
        assert_eq!(bank.find("Social Sciences").unwrap().questions.len(), 10);

        let catalog = starter_catalog().unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn catalog_from_toml() {
        let toml = r#"
[catalog]
name = "Mini"

[[courses]]
course_name = "Data Analysis with Python"
course_rating = 4.6
category = "Data Science"
course_link = "https://courses.example/data-analysis"
level = "Intermediate"
"#;
        let catalog = parse_catalog_str(toml, &PathBuf::from("mini.toml")).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.search("python")[0].rating, 4.6);
    }

    #[test]
    fn gradesheet_csv_with_header_and_comments() {
        let csv = "subject,score\n# term 1\nMath, 90\nPhysics,40%\n\nChem,85\n";
        let map = parse_gradesheet_bytes("grades.csv", csv.as_bytes()).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("Physics"), Some(40.0));
    }

    #[test]
    fn gradesheet_csv_rejects_bad_rows() {
        assert!(parse_gradesheet_csv("Math,90\nPhysics,abc\n").is_err());
        assert!(parse_gradesheet_csv("Math 90\n").is_err());
    }

    #[test]
    fn gradesheet_csv_first_row_needs_a_score_header() {
        let err = parse_gradesheet_csv("Math,abc\nPhysics,40\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");

        let map = parse_gradesheet_csv("Subject,Marks\nPhysics,40\n").unwrap();
        assert_eq!(map.get("Physics"), Some(40.0));
        assert!(map.get("Subject").is_none());
    }

    #[test]
    fn gradesheet_json_is_clamped() {
        let map = parse_gradesheet_bytes("grades.json", br#"{"Math": 105, "Art": 30}"#).unwrap();
        assert_eq!(map.get("Math"), Some(100.0));
    }

    #[test]
    fn gradesheet_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "Biology,55\nHistory,72\n").unwrap();
        let map = parse_gradesheet(&path).unwrap();
        assert_eq!(map.min_score(), Some(55.0));
    }
}
