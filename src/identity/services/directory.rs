//! Service layer for registration, profiles, and sector administration.

use crate::access::{self, AccessDenied};
use crate::identity::{
    domain::{
        IdentityDomainError, PhoneNumber, ProfileChanges, Role, Sector, SectorId, SectorName,
        User, UserId, UserProfile, Username,
    },
    ports::{
        IdentityRepositoryError, SectorRepository, UserQuery, UserRepository,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    username: String,
    role: Role,
    sector: Option<SectorId>,
    profile: UserProfile,
}

impl RegisterUserRequest {
    /// Creates a registration request with required fields.
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
            sector: None,
            profile: UserProfile::new(),
        }
    }

    /// Sets the sector membership.
    #[must_use]
    pub const fn with_sector(mut self, sector: SectorId) -> Self {
        self.sector = Some(sector);
        self
    }

    /// Sets the initial profile fields.
    #[must_use]
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Request payload for a partial profile edit; only set fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    /// Replacement login name.
    pub username: Option<String>,
    /// Replacement first name.
    pub first_name: Option<String>,
    /// Replacement last name.
    pub last_name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement phone number, unvalidated.
    pub phone_number: Option<String>,
    /// Replacement birth date.
    pub birth_date: Option<NaiveDate>,
    /// Replacement personal motto.
    pub motto: Option<String>,
    /// Replacement primary duty description.
    pub primary_duty: Option<String>,
}

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
    /// Access policy check failed.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The referenced sector does not exist.
    #[error("sector not found: {0}")]
    SectorNotFound(SectorId),
    /// The sector still has members and cannot be removed.
    #[error("sector {sector} still has {members} member(s)")]
    SectorHasMembers {
        /// Sector that was being removed.
        sector: SectorId,
        /// Number of users still assigned to it.
        members: usize,
    },
}

/// Result type for directory service operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Registration, profile, and sector administration service.
#[derive(Clone)]
pub struct DirectoryService<U, S, C>
where
    U: UserRepository,
    S: SectorRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    sectors: Arc<S>,
    clock: Arc<C>,
}

impl<U, S, C> DirectoryService<U, S, C>
where
    U: UserRepository,
    S: SectorRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(users: Arc<U>, sectors: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            users,
            sectors,
            clock,
        }
    }

    /// Registers a new user.
    ///
    /// The username is normalized to lower-case; a referenced sector must
    /// exist; the role/sector membership invariant is enforced.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when validation fails, the sector is
    /// missing, or the username is already taken.
    pub async fn register_user(&self, request: RegisterUserRequest) -> DirectoryResult<User> {
        let username = Username::new(request.username)?;
        if let Some(sector) = request.sector {
            self.require_sector(sector).await?;
        }
        let user = User::new(username, request.role, request.sector, &*self.clock)?
            .with_profile(request.profile);
        self.users.store(&user).await?;
        Ok(user)
    }

    /// Retrieves a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::UserNotFound`] when absent.
    pub async fn get_user(&self, id: UserId) -> DirectoryResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::UserNotFound(id))
    }

    /// Lists every registered user, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when the lookup fails.
    pub async fn list_users(&self) -> DirectoryResult<Vec<User>> {
        Ok(self.users.list(&UserQuery::default()).await?)
    }

    /// Applies a partial profile edit to the acting user's own record.
    ///
    /// Name-like fields are capitalized; a phone number is validated; a
    /// username change is re-checked for uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when validation fails or the user record
    /// has disappeared.
    pub async fn update_profile(
        &self,
        actor: &User,
        request: UpdateProfileRequest,
    ) -> DirectoryResult<User> {
        let mut user = self.get_user(actor.id()).await?;
        let phone_number = request.phone_number.map(PhoneNumber::new).transpose()?;
        let changes = ProfileChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number,
            birth_date: request.birth_date,
            motto: request.motto,
            primary_duty: request.primary_duty,
        };
        user.apply_profile_changes(changes, &*self.clock);
        if let Some(raw) = request.username {
            user.set_username(Username::new(raw)?, &*self.clock);
        }
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Creates a new sector. Restricted to directors and admins.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the actor lacks the capability or
    /// the name is empty.
    pub async fn create_sector(&self, actor: &User, name: impl Into<String>) -> DirectoryResult<Sector> {
        access::director_or_admin(actor)?;
        let sector = Sector::new(SectorName::new(name)?);
        self.sectors.store(&sector).await?;
        Ok(sector)
    }

    /// Renames an existing sector. Restricted to directors and admins.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the actor lacks the capability, the
    /// sector is missing, or the name is empty.
    pub async fn rename_sector(
        &self,
        actor: &User,
        id: SectorId,
        name: impl Into<String>,
    ) -> DirectoryResult<Sector> {
        access::director_or_admin(actor)?;
        let mut sector = self.require_sector(id).await?;
        sector.rename(SectorName::new(name)?);
        self.sectors.update(&sector).await?;
        Ok(sector)
    }

    /// Removes a sector. Restricted to directors and admins.
    ///
    /// Removal is refused while any user still belongs to the sector.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::SectorHasMembers`] when members remain.
    pub async fn remove_sector(&self, actor: &User, id: SectorId) -> DirectoryResult<()> {
        access::director_or_admin(actor)?;
        self.require_sector(id).await?;
        let members = self
            .users
            .list(&UserQuery {
                sector: Some(id),
                ..UserQuery::default()
            })
            .await?;
        if !members.is_empty() {
            return Err(DirectoryError::SectorHasMembers {
                sector: id,
                members: members.len(),
            });
        }
        self.sectors.remove(id).await?;
        Ok(())
    }

    /// Retrieves a sector by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::SectorNotFound`] when absent.
    pub async fn get_sector(&self, id: SectorId) -> DirectoryResult<Sector> {
        self.require_sector(id).await
    }

    /// Lists all sectors, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when the lookup fails.
    pub async fn list_sectors(&self) -> DirectoryResult<Vec<Sector>> {
        Ok(self.sectors.list().await?)
    }

    /// Returns the manager of an employee's sector, if one exists.
    ///
    /// Only employees have a sector boss; every other role yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when the lookup fails.
    pub async fn sector_boss(&self, user: &User) -> DirectoryResult<Option<User>> {
        if user.role() != Role::Employee {
            return Ok(None);
        }
        let Some(sector) = user.sector() else {
            return Ok(None);
        };
        let managers = self
            .users
            .list(&UserQuery {
                roles_in: Some(vec![Role::Manager]),
                sector: Some(sector),
                ..UserQuery::default()
            })
            .await?;
        Ok(managers.into_iter().next())
    }

    /// Counts the workers under a user's purview.
    ///
    /// A manager counts the employees of their own sector; a director
    /// counts everyone except directors and admins; everyone else has zero.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when the lookup fails.
    pub async fn total_workers(&self, user: &User) -> DirectoryResult<usize> {
        match user.role() {
            Role::Manager => {
                let workers = self
                    .users
                    .list(&UserQuery {
                        roles_in: Some(vec![Role::Employee]),
                        sector: user.sector(),
                        ..UserQuery::default()
                    })
                    .await?;
                Ok(workers.len())
            }
            Role::Director => {
                let workers = self
                    .users
                    .list(&UserQuery {
                        exclude_roles: vec![Role::Director, Role::Admin],
                        ..UserQuery::default()
                    })
                    .await?;
                Ok(workers.len())
            }
            Role::Admin | Role::Employee => Ok(0),
        }
    }

    async fn require_sector(&self, id: SectorId) -> DirectoryResult<Sector> {
        self.sectors
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::SectorNotFound(id))
    }
}
