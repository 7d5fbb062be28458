//! Canonical subject names.
//!
//! Catalog categories and quiz subjects arrive as free text ("Intro to
//! Psychology", "IT Fundamentals"). They are folded onto a fixed set of
//! canonical subjects so a quiz subject can be matched against course
//! categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The canonical subjects, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Health,
    InformationTechnology,
    MathAndLogic,
    ArtsAndHumanities,
    SocialSciences,
    LanguageLearning,
    ComputerScience,
    DataScience,
    Business,
    Other,
}

/// Substring keywords per subject, checked in order.
const RULES: &[(Subject, &[&str])] = &[
    (Subject::Health, &["health"]),
    (Subject::InformationTechnology, &["information technology"]),
    (Subject::MathAndLogic, &["math", "logic"]),
    (Subject::ArtsAndHumanities, &["arts", "humanities", "literature"]),
    (Subject::SocialSciences, &["social science", "psychology", "history"]),
    (Subject::LanguageLearning, &["language"]),
    (Subject::ComputerScience, &["computer science", "programming"]),
    (Subject::DataScience, &["data science", "analytics"]),
    (Subject::Business, &["business", "management", "finance"]),
];

/// Short keywords that only count as whole words.
const WORD_RULES: &[(Subject, &str)] = &[
    (Subject::InformationTechnology, "it"),
    (Subject::ComputerScience, "cs"),
];

impl Subject {
    pub const ALL: [Subject; 10] = [
        Subject::Health,
        Subject::InformationTechnology,
        Subject::MathAndLogic,
        Subject::ArtsAndHumanities,
        Subject::SocialSciences,
        Subject::LanguageLearning,
        Subject::ComputerScience,
        Subject::DataScience,
        Subject::Business,
        Subject::Other,
    ];

    /// Fold free text onto a canonical subject.
    pub fn standardize(raw: &str) -> Subject {
        let lower = raw.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        for (subject, keywords) in RULES {
            if keywords.iter().any(|k| lower.contains(k)) {
                return *subject;
            }
            if let Some((_, word)) = WORD_RULES.iter().find(|(s, _)| s == subject) {
                if words.contains(word) {
                    return *subject;
                }
            }
        }
        Subject::Other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Health => "health",
            Subject::InformationTechnology => "information technology",
            Subject::MathAndLogic => "math and logic",
            Subject::ArtsAndHumanities => "arts and humanities",
            Subject::SocialSciences => "social sciences",
            Subject::LanguageLearning => "language learning",
            Subject::ComputerScience => "computer science",
            Subject::DataScience => "data science",
            Subject::Business => "business",
            Subject::Other => "other",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    /// Exact canonical names only; use [`Subject::standardize`] for free text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Subject::ALL
            .into_iter()
            .find(|subj| subj.as_str() == lower)
            .ok_or_else(|| format!("unknown subject: {s}"))
    }
}

/// Key used by realtime-database paths: lowercase with whitespace removed.
pub fn path_key(subject: &str) -> String {
    subject
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardize_keywords() {
        assert_eq!(Subject::standardize("Public Health"), Subject::Health);
        assert_eq!(Subject::standardize("Social Sciences"), Subject::SocialSciences);
        assert_eq!(Subject::standardize("Intro to Psychology"), Subject::SocialSciences);
        assert_eq!(Subject::standardize("Discrete Math"), Subject::MathAndLogic);
        assert_eq!(Subject::standardize("Python Programming"), Subject::ComputerScience);
        assert_eq!(Subject::standardize("Business Analytics"), Subject::DataScience);
        assert_eq!(Subject::standardize("Finance 101"), Subject::Business);
        assert_eq!(Subject::standardize("Underwater Basket Weaving"), Subject::Other);
    }

    #[test]
    fn short_keywords_match_whole_words_only() {
        assert_eq!(Subject::standardize("IT Fundamentals"), Subject::InformationTechnology);
        assert_eq!(Subject::standardize("CS50"), Subject::Other);
        assert_eq!(Subject::standardize("Intro CS"), Subject::ComputerScience);
        // "literature" contains "it" but is not the word "it".
        assert_eq!(Subject::standardize("English Literature"), Subject::ArtsAndHumanities);
        assert_eq!(Subject::standardize("Quantitative Methods"), Subject::Other);
    }

    #[test]
    fn parse_canonical_names() {
        assert_eq!("Data Science".parse::<Subject>().unwrap(), Subject::DataScience);
        assert!("biology".parse::<Subject>().is_err());
        assert_eq!(Subject::MathAndLogic.to_string(), "math and logic");
    }

    #[test]
    fn realtime_path_key() {
        assert_eq!(path_key("Social Sciences"), "socialsciences");
        assert_eq!(path_key(" Business  Writing "), "businesswriting");
    }
}
