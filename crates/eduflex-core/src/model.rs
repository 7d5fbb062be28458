//! Core data model types for eduflex.
//!
//! Questions, answer ledgers, scores, difficulty tiers, course entries and
//! gradesheet weakness maps. Wire names follow the quiz backend's JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One answer choice of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Short label the respondent selects (e.g. "A").
    pub label: String,
    /// Display text.
    pub text: String,
}

impl QuizOption {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Parse a backend option string such as `"B) Matplotlib"`.
    ///
    /// Strings without a short `label) ` prefix are labelled by position
    /// (A, B, C, ...).
    pub fn from_wire(index: usize, raw: &str) -> Self {
        if let Some((label, text)) = raw.split_once(") ") {
            let label = label.trim();
            if !label.is_empty()
                && label.len() <= 2
                && label.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Self::new(label, text.trim());
            }
        }
        Self::new(positional_label(index), raw.trim())
    }
}

impl fmt::Display for QuizOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.label, self.text)
    }
}

/// Label for the option at `index`: A..Z, then the 1-based number.
pub fn positional_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

/// A single quiz question, owned by the external question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier within the bank.
    #[serde(default)]
    pub id: String,
    /// Subject this question belongs to.
    #[serde(default)]
    pub subject_id: String,
    /// The question text.
    #[serde(alias = "question")]
    pub prompt: String,
    /// Ordered answer choices.
    #[serde(default)]
    pub options: Vec<QuizOption>,
    /// Label of the correct option. Absent when the source strips answer keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_label: Option<String>,
}

impl Question {
    /// Build a question from raw option strings as sources store them.
    ///
    /// `answer` may be an option label or the full text of the correct option.
    pub fn from_wire(
        id: impl Into<String>,
        subject_id: impl Into<String>,
        prompt: &str,
        raw_options: &[String],
        answer: Option<&str>,
    ) -> Self {
        let options: Vec<QuizOption> = raw_options
            .iter()
            .enumerate()
            .map(|(i, raw)| QuizOption::from_wire(i, raw))
            .collect();
        let correct_label = answer.map(str::trim).map(|answer| {
            options
                .iter()
                .find(|o| o.text.trim().eq_ignore_ascii_case(answer))
                .map(|o| o.label.clone())
                .unwrap_or_else(|| answer.to_string())
        });
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            prompt: prompt.trim().to_string(),
            options,
            correct_label,
        }
    }

    /// Whether `label` names one of this question's options.
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| labels_match(&o.label, label))
    }

    /// Copy of this question without its answer key.
    pub fn without_answer(&self) -> Question {
        Question {
            correct_label: None,
            ..self.clone()
        }
    }
}

/// Label comparison used everywhere answers are checked: trimmed, ASCII case-insensitive.
pub fn labels_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// The respondent's recorded answers for one attempt, keyed by question index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLedger {
    answers: BTreeMap<usize, String>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the selected label for a question.
    pub fn record(&mut self, index: usize, label: impl Into<String>) -> Option<String> {
        self.answers.insert(index, label.into())
    }

    pub fn selected(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.answers.iter().map(|(i, l)| (*i, l.as_str()))
    }

    /// Check that every recorded index refers to one of `question_count` questions.
    pub fn validate_against(&self, question_count: usize) -> CoreResult<()> {
        match self.answers.keys().find(|&&i| i >= question_count) {
            Some(i) => Err(CoreError::invalid(format!(
                "answer recorded for question {i}, but the quiz has {question_count} questions"
            ))),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for AnswerLedger {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().map(|(i, l)| (i, l.into())).collect(),
        }
    }
}

/// Outcome of scoring one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub correct_count: usize,
    pub total_count: usize,
    /// `correct_count / total_count * 100`, or 0 for an empty quiz.
    pub percentage: f64,
}

/// Discrete difficulty classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "beginner",
            DifficultyTier::Intermediate => "intermediate",
            DifficultyTier::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(DifficultyTier::Beginner),
            "intermediate" => Ok(DifficultyTier::Intermediate),
            "advanced" => Ok(DifficultyTier::Advanced),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

/// A course offered by the external catalog. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEntry {
    #[serde(rename = "course_name", alias = "name", alias = "Name")]
    pub name: String,
    #[serde(rename = "course_rating", alias = "rating", alias = "Rating", default)]
    pub rating: f64,
    #[serde(default, alias = "Category")]
    pub category: String,
    #[serde(rename = "course_link", alias = "link", alias = "Link", default)]
    pub link: String,
    /// Free-text level from the catalog, e.g. "Beginner" or "Advanced".
    #[serde(
        default,
        alias = "course_level",
        alias = "Level",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<String>,
}

impl CourseEntry {
    /// Whether this entry's level mentions the given tier.
    pub fn matches_tier(&self, tier: DifficultyTier) -> bool {
        self.level
            .as_deref()
            .is_some_and(|l| l.to_lowercase().contains(tier.as_str()))
    }
}

/// A recommended course tagged with the weak subject that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedCourse {
    /// Source subject. Empty when a remote analyzer does not report it.
    #[serde(default)]
    pub subject: String,
    #[serde(flatten)]
    pub course: CourseEntry,
}

/// Per-subject gradesheet scores, clamped to `[0, 100]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct SubjectWeaknessMap {
    scores: BTreeMap<String, f64>,
}

impl SubjectWeaknessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(subject, score)` pairs, clamping each score.
    pub fn from_scores<I, S>(scores: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (subject, score) in scores {
            map.insert(subject, score)?;
        }
        Ok(map)
    }

    /// Insert a subject score. Later inserts for the same subject replace earlier ones.
    pub fn insert(&mut self, subject: impl Into<String>, score: f64) -> CoreResult<()> {
        let subject = subject.into();
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(CoreError::invalid("gradesheet subject name is empty"));
        }
        if !score.is_finite() {
            return Err(CoreError::invalid(format!(
                "gradesheet score for {subject} is not a number"
            )));
        }
        self.scores
            .insert(subject.to_string(), score.clamp(0.0, 100.0));
        Ok(())
    }

    pub fn get(&self, subject: &str) -> Option<f64> {
        self.scores.get(subject).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(s, v)| (s.as_str(), *v))
    }

    /// Lowest score in the map.
    pub fn min_score(&self) -> Option<f64> {
        self.scores.values().copied().reduce(f64::min)
    }

    /// The entries whose subject is in `subjects`.
    pub fn subset<'a>(&self, subjects: impl IntoIterator<Item = &'a String>) -> Self {
        let scores = subjects
            .into_iter()
            .filter_map(|s| self.scores.get(s).map(|v| (s.clone(), *v)))
            .collect();
        Self { scores }
    }
}

impl TryFrom<BTreeMap<String, f64>> for SubjectWeaknessMap {
    type Error = CoreError;

    fn try_from(scores: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_scores(scores)
    }
}

impl From<SubjectWeaknessMap> for BTreeMap<String, f64> {
    fn from(map: SubjectWeaknessMap) -> Self {
        map.scores
    }
}

/// Who is taking the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub age: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_display_and_parse() {
        assert_eq!(DifficultyTier::Advanced.to_string(), "advanced");
        assert_eq!(
            "Intermediate".parse::<DifficultyTier>().unwrap(),
            DifficultyTier::Intermediate
        );
        assert!("expert".parse::<DifficultyTier>().is_err());
        assert_eq!(
            serde_json::to_string(&DifficultyTier::Beginner).unwrap(),
            "\"beginner\""
        );
    }

    #[test]
    fn option_from_wire() {
        let opt = QuizOption::from_wire(1, "B) Matplotlib");
        assert_eq!(opt.label, "B");
        assert_eq!(opt.text, "Matplotlib");

        let opt = QuizOption::from_wire(2, "All of the above");
        assert_eq!(opt.label, "C");
        assert_eq!(opt.text, "All of the above");
        assert_eq!(opt.to_string(), "C) All of the above");
    }

    #[test]
    fn question_from_wire_resolves_answer_text() {
        let options = vec!["Tissue".to_string(), "Cell".to_string()];
        let q = Question::from_wire("q1", "health", " Unit of life? ", &options, Some("cell"));
        assert_eq!(q.prompt, "Unit of life?");
        assert_eq!(q.correct_label.as_deref(), Some("B"));

        let labelled = vec!["A) Yes".to_string(), "B) No".to_string()];
        let q = Question::from_wire("q2", "x", "?", &labelled, Some("b"));
        assert_eq!(q.correct_label.as_deref(), Some("b"));
        assert!(q.has_option("B"));

        let q = Question::from_wire("q3", "x", "?", &labelled, None);
        assert!(q.correct_label.is_none());
    }

    #[test]
    fn ledger_uses_string_keys_on_the_wire() {
        let ledger: AnswerLedger = [(0, "A"), (2, "C")].into_iter().collect();
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"0":"A","2":"C"}"#);

        let back: AnswerLedger = serde_json::from_str(r#"{"1":"b"}"#).unwrap();
        assert_eq!(back.selected(1), Some("b"));
    }

    #[test]
    fn ledger_rejects_out_of_range_index() {
        let ledger: AnswerLedger = [(3, "A")].into_iter().collect();
        assert!(ledger.validate_against(4).is_ok());
        assert!(matches!(
            ledger.validate_against(3),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn weakness_map_clamps_and_rejects_nan() {
        let map = SubjectWeaknessMap::from_scores([("Math", 120.0), ("Art", -5.0)]).unwrap();
        assert_eq!(map.get("Math"), Some(100.0));
        assert_eq!(map.get("Art"), Some(0.0));
        assert_eq!(map.min_score(), Some(0.0));

        let err = SubjectWeaknessMap::from_scores([("Math", f64::NAN)]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn weakness_map_deserialize_clamps() {
        let map: SubjectWeaknessMap = serde_json::from_str(r#"{"Physics": 140}"#).unwrap();
        assert_eq!(map.get("Physics"), Some(100.0));
    }

    #[test]
    fn course_entry_accepts_backend_and_firebase_names() {
        let backend: CourseEntry = serde_json::from_str(
            r#"{"course_name":"Intro to ML","course_rating":4.7,"category":"data science","course_link":"https://x"}"#,
        )
        .unwrap();
        assert_eq!(backend.name, "Intro to ML");
        assert_eq!(backend.rating, 4.7);

        let firebase: CourseEntry =
            serde_json::from_str(r#"{"Name":"Psych 101","Link":"https://y"}"#).unwrap();
        assert_eq!(firebase.name, "Psych 101");
        assert_eq!(firebase.link, "https://y");
        assert_eq!(firebase.rating, 0.0);

        let json = serde_json::to_value(&backend).unwrap();
        assert!(json.get("course_name").is_some());
        assert!(json.get("level").is_none());
    }

    #[test]
    fn course_entry_tier_match() {
        let course = CourseEntry {
            name: "x".into(),
            rating: 4.0,
            category: "business".into(),
            link: String::new(),
            level: Some("Beginner Level".into()),
        };
        assert!(course.matches_tier(DifficultyTier::Beginner));
        assert!(!course.matches_tier(DifficultyTier::Advanced));
    }
}
