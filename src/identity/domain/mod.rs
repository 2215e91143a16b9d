//! Domain model for users, roles, and sectors.
//!
//! The identity domain owns the organizational hierarchy: a closed role
//! enumeration, sector grouping entities, and the user aggregate with its
//! role/sector membership invariant.

mod error;
mod ids;
mod role;
mod sector;
mod user;

pub use error::IdentityDomainError;
pub use ids::{SectorId, UserId};
pub use role::{ParseRoleError, Role};
pub use sector::{Sector, SectorName};
pub use user::{PersistedUserData, PhoneNumber, ProfileChanges, User, UserProfile, Username};

/// Capitalizes a trimmed value: first letter upper-case, rest lower-case.
pub(crate) fn capitalized(value: &str) -> String {
    let mut chars = value.trim().chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
