//! Difficulty tier classification.
//!
//! The tier bands are a policy injected at the service boundary. The default
//! bands put 80 and above in `advanced`, 50 up to 80 in `intermediate`, and
//! everything below 50 in `beginner`. Lower bounds are inclusive.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::model::DifficultyTier;

/// Maps a score percentage (and optionally the student's age) to a tier.
pub trait DifficultyPolicy: Send + Sync {
    fn classify(&self, percentage: f64, age: Option<u32>) -> DifficultyTier;
}

/// Lower-bound score bands. Age is accepted but does not affect the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBands {
    /// Minimum percentage for `advanced`.
    #[serde(default = "default_advanced_min")]
    pub advanced_min: f64,
    /// Minimum percentage for `intermediate`.
    #[serde(default = "default_intermediate_min")]
    pub intermediate_min: f64,
}

fn default_advanced_min() -> f64 {
    80.0
}

fn default_intermediate_min() -> f64 {
    50.0
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            advanced_min: default_advanced_min(),
            intermediate_min: default_intermediate_min(),
        }
    }
}

impl ScoreBands {
    pub fn new(intermediate_min: f64, advanced_min: f64) -> CoreResult<Self> {
        let bands = Self {
            advanced_min,
            intermediate_min,
        };
        bands.validate()?;
        Ok(bands)
    }

    /// Bands must lie in `[0, 100]` and be ordered.
    pub fn validate(&self) -> CoreResult<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.intermediate_min) || !in_range(self.advanced_min) {
            return Err(CoreError::invalid(format!(
                "difficulty bands must be within 0..=100 (intermediate_min={}, advanced_min={})",
                self.intermediate_min, self.advanced_min
            )));
        }
        if self.intermediate_min > self.advanced_min {
            return Err(CoreError::invalid(format!(
                "intermediate_min ({}) must not exceed advanced_min ({})",
                self.intermediate_min, self.advanced_min
            )));
        }
        Ok(())
    }
}

impl DifficultyPolicy for ScoreBands {
    fn classify(&self, percentage: f64, _age: Option<u32>) -> DifficultyTier {
        // NaN fails both comparisons and lands in beginner.
        let p = percentage.clamp(0.0, 100.0);
        if p >= self.advanced_min {
            DifficultyTier::Advanced
        } else if p >= self.intermediate_min {
            DifficultyTier::Intermediate
        } else {
            DifficultyTier::Beginner
        }
    }
}

/// Classify with the default bands.
pub fn classify(percentage: f64) -> DifficultyTier {
    ScoreBands::default().classify(percentage, None)
}
