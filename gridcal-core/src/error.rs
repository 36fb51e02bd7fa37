//! Error types for gridcal.

use thiserror::Error;

use crate::conflict::ConflictSummary;

/// Reasons an event draft is rejected before it reaches the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("End time cannot be before start time")]
    EndBeforeStart,
}

/// Errors that can occur in gridcal operations.
#[derive(Error, Debug)]
pub enum CalError {
    #[error("Invalid event: {0}")]
    Validation(#[from] ValidationError),

    #[error("This event conflicts with: {}", join_conflicts(.0))]
    Conflict(Vec<ConflictSummary>),

    #[error("Malformed recurrence rule: {0}")]
    MalformedRule(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")]
    InvalidDate(String),

    #[error("Could not decode stored events: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn join_conflicts(conflicts: &[ConflictSummary]) -> String {
    conflicts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for gridcal operations.
pub type CalResult<T> = Result<T, CalError>;
