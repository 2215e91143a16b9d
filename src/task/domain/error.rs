//! Error types for task domain validation and parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or editing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The problem statement is empty after trimming.
    #[error("task problem must not be empty")]
    EmptyProblem,

    /// The deadline does not fall strictly after the reference date.
    #[error("task deadline {deadline} must fall strictly after {today}")]
    DeadlineNotInFuture {
        /// Deadline date that was rejected.
        deadline: NaiveDate,
        /// Date the validation ran against.
        today: NaiveDate,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
