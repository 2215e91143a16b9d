//! Repository ports for user and sector persistence.

use crate::identity::domain::{Role, Sector, SectorId, User, UserId, Username};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity repository operations.
pub type IdentityRepositoryResult<T> = Result<T, IdentityRepositoryError>;

/// Errors returned by identity repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityRepositoryError {
    /// A user with the same username already exists.
    #[error("duplicate username: {0}")]
    DuplicateUsername(Username),

    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// A sector with the same identifier already exists.
    #[error("duplicate sector identifier: {0}")]
    DuplicateSector(SectorId),

    /// The sector was not found.
    #[error("sector not found: {0}")]
    SectorNotFound(SectorId),

    /// Persistence-layer failure, kept distinct from missing records.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Filter predicates for user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Restrict to users whose role is in the set.
    pub roles_in: Option<Vec<Role>>,
    /// Exclude users with any of these roles.
    pub exclude_roles: Vec<Role>,
    /// Restrict to members of this sector.
    pub sector: Option<SectorId>,
}

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateUser`] when the user ID
    /// already exists or [`IdentityRepositoryError::DuplicateUsername`] when
    /// the username is taken.
    async fn store(&self, user: &User) -> IdentityRepositoryResult<()>;

    /// Persists changes to an existing user (profile, username).
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::UserNotFound`] when the user does
    /// not exist or [`IdentityRepositoryError::DuplicateUsername`] when a
    /// username change collides with another user.
    async fn update(&self, user: &User) -> IdentityRepositoryResult<()>;

    /// Finds a user by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: UserId) -> IdentityRepositoryResult<Option<User>>;

    /// Finds a user by username. Returns `None` when absent.
    async fn find_by_username(&self, username: &Username)
    -> IdentityRepositoryResult<Option<User>>;

    /// Lists users matching the query, ordered by username.
    async fn list(&self, query: &UserQuery) -> IdentityRepositoryResult<Vec<User>>;
}

/// Sector persistence contract.
#[async_trait]
pub trait SectorRepository: Send + Sync {
    /// Stores a new sector.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateSector`] when the sector
    /// ID already exists.
    async fn store(&self, sector: &Sector) -> IdentityRepositoryResult<()>;

    /// Persists changes to an existing sector.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::SectorNotFound`] when the sector
    /// does not exist.
    async fn update(&self, sector: &Sector) -> IdentityRepositoryResult<()>;

    /// Removes a sector.
    ///
    /// Referential integrity (no remaining members) is checked by the
    /// service layer before this is invoked.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::SectorNotFound`] when the sector
    /// does not exist.
    async fn remove(&self, id: SectorId) -> IdentityRepositoryResult<()>;

    /// Finds a sector by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: SectorId) -> IdentityRepositoryResult<Option<Sector>>;

    /// Lists all sectors, ordered by name.
    async fn list(&self) -> IdentityRepositoryResult<Vec<Sector>>;
}
