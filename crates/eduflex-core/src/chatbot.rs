//! Rule-based career advice chatbot.
//!
//! Rules are checked in a fixed order and the first match wins. Career topic
//! replies are drawn at random from an advice table loaded from JSON.

use anyhow::{Context, Result};
use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::Deserialize;

const GREETING: &str = "Hello! How can I assist you today?";
const WELLBEING: &str = "I am just a bot, but I am here to help you!";
const BOT_NAME: &str = "I am your friendly career guide!";
const JOKE: &str = "Why don't scientists trust atoms? Because they make up everything!";
const NO_ADVICE: &str = "I'm not sure about that. Can you ask something else?";
const FALLBACK: &str =
    "I'm not sure how to respond to that. You can ask about career paths after 12th!";

pub const DEFAULT_CAREER_ADVICE: &str = include_str!("../data/career-advice.json");

/// Career topics with canned advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareerTopic {
    Engineering,
    Medicine,
    AfterTwelfth,
}

/// What the user appears to be asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Wellbeing,
    BotName,
    Joke,
    Career(CareerTopic),
    Unknown,
}

/// Advice lines per topic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareerAdvice {
    #[serde(default)]
    pub engineering: Vec<String>,
    #[serde(default)]
    pub mbbs: Vec<String>,
    #[serde(default, alias = "after12th")]
    pub after_12th: Vec<String>,
}

impl CareerAdvice {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse career advice JSON")
    }

    fn lines(&self, topic: CareerTopic) -> &[String] {
        match topic {
            CareerTopic::Engineering => &self.engineering,
            CareerTopic::Medicine => &self.mbbs,
            CareerTopic::AfterTwelfth => &self.after_12th,
        }
    }
}

fn has_word(input: &str, word: &str) -> bool {
    input
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

/// Classify a message. Matching is case-insensitive.
pub fn detect_intent(input: &str) -> Intent {
    let input = input.to_lowercase();
    if input.contains("hello") || has_word(&input, "hi") {
        Intent::Greeting
    } else if input.contains("how are you") {
        Intent::Wellbeing
    } else if input.contains("what is your name") {
        Intent::BotName
    } else if input.contains("tell me a joke") {
        Intent::Joke
    } else if input.contains("engineering") {
        Intent::Career(CareerTopic::Engineering)
    } else if input.contains("mbbs") {
        Intent::Career(CareerTopic::Medicine)
    } else if input.contains("what to do after 12th") {
        Intent::Career(CareerTopic::AfterTwelfth)
    } else {
        Intent::Unknown
    }
}

#[derive(Debug, Clone)]
pub struct CareerBot {
    advice: CareerAdvice,
}

impl CareerBot {
    pub fn new(advice: CareerAdvice) -> Self {
        Self { advice }
    }

    /// A bot using the bundled advice table.
    pub fn with_default_advice() -> Result<Self> {
        Ok(Self::new(CareerAdvice::from_json(DEFAULT_CAREER_ADVICE)?))
    }

    /// Reply to a message. Blank input gets no reply.
    pub fn reply<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Option<String> {
        if input.trim().is_empty() {
            return None;
        }
        let text = match detect_intent(input) {
            Intent::Greeting => GREETING,
            Intent::Wellbeing => WELLBEING,
            Intent::BotName => BOT_NAME,
            Intent::Joke => JOKE,
            Intent::Career(topic) => self
                .advice
                .lines(topic)
                .choose(rng)
                .map(String::as_str)
                .unwrap_or(NO_ADVICE),
            Intent::Unknown => FALLBACK,
        };
        Some(text.to_string())
    }
}
