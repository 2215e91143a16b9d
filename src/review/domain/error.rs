//! Error types for review domain validation.

use thiserror::Error;

/// Errors returned while constructing review domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The review content is empty after trimming.
    #[error("review content must not be empty")]
    EmptyContent,
}
