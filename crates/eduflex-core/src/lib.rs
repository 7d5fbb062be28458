//! eduflex-core: quiz scoring, difficulty tiers and course recommendation.
//!
//! This crate holds the data model, the collaborator traits, and the pure
//! scoring, classification and weakness logic that the rest of eduflex is
//! built on. HTTP collaborators live in `eduflex-providers`.

pub mod bank;
pub mod catalog;
pub mod chatbot;
pub mod difficulty;
pub mod error;
pub mod model;
pub mod parser;
pub mod recommend;
pub mod report;
pub mod scoring;
pub mod service;
pub mod session;
pub mod subjects;
pub mod traits;
pub mod weakness;

pub use difficulty::{classify, DifficultyPolicy, ScoreBands};
pub use error::{CoreError, CoreResult};
pub use recommend::recommend;
pub use scoring::score;
pub use service::QuizService;
pub use weakness::{analyze_weakness, recommend_for_weaknesses};
