//! Core error types.
//!
//! Collaborator traits return `CoreError` so the recommendation selector can
//! tell a degraded external service apart from bad caller input without
//! string matching.

use thiserror::Error;

/// Errors surfaced by the scoring and recommendation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Malformed caller input, e.g. a missing question set.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A collection that must be non-empty was empty.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A network or parse failure from an external collaborator.
    #[error("external service error: {0}")]
    ExternalService(String),
}

impl CoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CoreError::InvalidInput(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        CoreError::EmptyInput(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        CoreError::ExternalService(msg.into())
    }

    /// Returns `true` if this error came from a collaborator rather than the caller.
    pub fn is_external(&self) -> bool {
        matches!(self, CoreError::ExternalService(_))
    }
}

/// Convenience alias used across the core.
pub type CoreResult<T> = Result<T, CoreError>;
