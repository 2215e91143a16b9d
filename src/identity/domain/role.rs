//! Organizational role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed set of organizational roles.
///
/// Permission checks match exhaustively on this enum so that an unknown or
/// misspelled role value cannot silently evaluate to "denied".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Global administrator, outside any sector.
    Admin,
    /// Organization head, outside any sector.
    Director,
    /// Sector head; assigns tasks within their own sector.
    Manager,
    /// Sector member; receives assigned tasks.
    Employee,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Director => "director",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    /// Whether users with this role must belong to exactly one sector.
    #[must_use]
    pub const fn requires_sector(self) -> bool {
        matches!(self, Self::Manager | Self::Employee)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "director" => Ok(Self::Director),
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
