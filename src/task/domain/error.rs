//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating task input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The trimmed task title is longer than the store accepts.
    #[error("task title has {actual} characters; at most {max} are allowed")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
        /// Length of the rejected title in characters.
        actual: usize,
    },

    /// The epoch-seconds value cannot be represented as a timestamp.
    #[error("invalid task date timestamp: {0}")]
    InvalidTimestamp(i64),

    /// The list filter date is not in `YYYY-MM-DD` form.
    #[error("invalid date format '{0}' (use YYYY-MM-DD)")]
    InvalidDateFilter(String),

    /// The status value does not name a known task status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The request body could not be decoded.
    #[error("malformed task payload: {0}")]
    MalformedPayload(String),
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
