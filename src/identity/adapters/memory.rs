//! In-memory repositories for identity tests and default wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{Sector, SectorId, User, UserId, Username},
    ports::{
        IdentityRepositoryError, IdentityRepositoryResult, SectorRepository, UserQuery,
        UserRepository,
    },
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    username_index: HashMap<Username, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(query: &UserQuery, user: &User) -> bool {
    query
        .roles_in
        .as_ref()
        .is_none_or(|roles| roles.contains(&user.role()))
        && !query.exclude_roles.contains(&user.role())
        && query.sector.is_none_or(|sector| user.sector() == Some(sector))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.users.contains_key(&user.id()) {
            return Err(IdentityRepositoryError::DuplicateUser(user.id()));
        }
        if state.username_index.contains_key(user.username()) {
            return Err(IdentityRepositoryError::DuplicateUsername(
                user.username().clone(),
            ));
        }
        state
            .username_index
            .insert(user.username().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let old_user = state
            .users
            .get(&user.id())
            .ok_or(IdentityRepositoryError::UserNotFound(user.id()))?
            .clone();

        if old_user.username() != user.username() {
            if state.username_index.contains_key(user.username()) {
                return Err(IdentityRepositoryError::DuplicateUsername(
                    user.username().clone(),
                ));
            }
            state.username_index.remove(old_user.username());
            state
                .username_index
                .insert(user.username().clone(), user.id());
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> IdentityRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> IdentityRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let user = state
            .username_index
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn list(&self, query: &UserQuery) -> IdentityRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| matches(query, user))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username().as_str().cmp(b.username().as_str()));
        Ok(users)
    }
}

/// Thread-safe in-memory sector repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySectorRepository {
    state: Arc<RwLock<HashMap<SectorId, Sector>>>,
}

impl InMemorySectorRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SectorRepository for InMemorySectorRepository {
    async fn store(&self, sector: &Sector) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&sector.id()) {
            return Err(IdentityRepositoryError::DuplicateSector(sector.id()));
        }
        state.insert(sector.id(), sector.clone());
        Ok(())
    }

    async fn update(&self, sector: &Sector) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.contains_key(&sector.id()) {
            return Err(IdentityRepositoryError::SectorNotFound(sector.id()));
        }
        state.insert(sector.id(), sector.clone());
        Ok(())
    }

    async fn remove(&self, id: SectorId) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(IdentityRepositoryError::SectorNotFound(id))
    }

    async fn find_by_id(&self, id: SectorId) -> IdentityRepositoryResult<Option<Sector>> {
        let state = self.state.read().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }

    async fn list(&self) -> IdentityRepositoryResult<Vec<Sector>> {
        let state = self.state.read().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut sectors: Vec<Sector> = state.values().cloned().collect();
        sectors.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(sectors)
    }
}
