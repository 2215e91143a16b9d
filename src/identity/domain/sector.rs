//! Sector grouping entity.

use super::{IdentityDomainError, SectorId, capitalized};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, capitalized sector name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorName(String);

impl SectorName {
    /// Creates a validated sector name.
    ///
    /// The value is trimmed and capitalized (first letter upper-case, rest
    /// lower-case).
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptySectorName`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let normalized = capitalized(&value.into());
        if normalized.is_empty() {
            return Err(IdentityDomainError::EmptySectorName);
        }
        Ok(Self(normalized))
    }

    /// Returns the sector name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectorName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named grouping of managers and employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    id: SectorId,
    name: SectorName,
}

impl Sector {
    /// Creates a new sector.
    #[must_use]
    pub fn new(name: SectorName) -> Self {
        Self {
            id: SectorId::new(),
            name,
        }
    }

    /// Reconstructs a sector from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: SectorId, name: SectorName) -> Self {
        Self { id, name }
    }

    /// Returns the sector identifier.
    #[must_use]
    pub const fn id(&self) -> SectorId {
        self.id
    }

    /// Returns the sector name.
    #[must_use]
    pub const fn name(&self) -> &SectorName {
        &self.name
    }

    /// Replaces the sector name.
    pub fn rename(&mut self, name: SectorName) {
        self.name = name;
    }
}
