//! Error types for identity domain validation.

use super::Role;
use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The phone number does not follow the `+998` + nine digits format.
    #[error("invalid phone number '{0}', expected +998 followed by nine digits")]
    InvalidPhoneNumber(String),

    /// The sector name is empty after trimming.
    #[error("sector name must not be empty")]
    EmptySectorName,

    /// The role requires sector membership but none was given.
    #[error("{role} users must belong to a sector")]
    SectorRequired {
        /// Role that was being assigned.
        role: Role,
    },

    /// The role forbids sector membership but one was given.
    #[error("{role} users must not belong to a sector")]
    SectorNotPermitted {
        /// Role that was being assigned.
        role: Role,
    },
}
