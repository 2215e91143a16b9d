//! Service layer assembling statistics across reporting scopes.
//!
//! Every scope feeds a different task collection into the same aggregation
//! routine. Role- and sector-level scoping is resolved into explicit
//! user-id sets through the identity ports before querying the task store.

use crate::identity::{
    domain::{Role, Sector, SectorId, User, UserId},
    ports::{IdentityRepositoryError, SectorRepository, UserQuery, UserRepository},
};
use crate::stats::domain::{ScopeStats, StatusBreakdown, UserStats};
use crate::task::ports::{TaskQuery, TaskRepository, TaskRepositoryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Per-sector entry of the all-sectors report.
///
/// `stats` is `None` for sectors without leadership-assigned tasks; such
/// entries serialize as `{}` in the reporting contract.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorReport {
    /// Sector the entry describes.
    pub sector: Sector,
    /// Aggregate, absent when the sector has no tasks in scope.
    pub stats: Option<ScopeStats>,
}

/// Per-user entry of stat listings (managers, employees, all users).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReport {
    /// User the entry describes.
    pub user: UserId,
    /// First name, empty when unset.
    pub first_name: String,
    /// Last name, empty when unset.
    pub last_name: String,
    /// User-level metrics.
    #[serde(flatten)]
    pub stats: UserStats,
}

/// Service-level errors for statistics operations.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Identity repository operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityRepositoryError),
    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The referenced sector does not exist.
    #[error("sector not found: {0}")]
    SectorNotFound(SectorId),
}

/// Result type for statistics service operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Statistics reporting service.
#[derive(Clone)]
pub struct StatsService<T, U, S>
where
    T: TaskRepository,
    U: UserRepository,
    S: SectorRepository,
{
    tasks: Arc<T>,
    users: Arc<U>,
    sectors: Arc<S>,
}

impl<T, U, S> StatsService<T, U, S>
where
    T: TaskRepository,
    U: UserRepository,
    S: SectorRepository,
{
    /// Creates a new statistics service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>, sectors: Arc<S>) -> Self {
        Self {
            tasks,
            users,
            sectors,
        }
    }

    /// Global scope: active tasks assigned by admins or directors.
    ///
    /// Returns `None` when the scope is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] when a lookup fails.
    pub async fn global(&self) -> StatsResult<Option<ScopeStats>> {
        let bosses = self.leadership_ids().await?;
        let tasks = self
            .tasks
            .list(&TaskQuery {
                bosses_in: Some(bosses),
                active_only: true,
                ..TaskQuery::default()
            })
            .await?;
        let breakdown = StatusBreakdown::from_tasks(&tasks);
        Ok(ScopeStats::from_breakdown(&breakdown))
    }

    /// Per-sector scope for every sector, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] when a lookup fails.
    pub async fn all_sectors(&self) -> StatsResult<Vec<SectorReport>> {
        let bosses = self.leadership_ids().await?;
        let sectors = self.sectors.list().await?;
        let mut reports = Vec::with_capacity(sectors.len());
        for sector in sectors {
            let breakdown = self.sector_breakdown(&sector, bosses.clone()).await?;
            let stats = ScopeStats::from_breakdown(&breakdown)
                .map(|stats| stats.with_sector(sector.name().as_str()));
            reports.push(SectorReport { sector, stats });
        }
        Ok(reports)
    }

    /// Per-sector scope for a single sector.
    ///
    /// Returns `None` when the scope is empty; a non-empty payload carries
    /// the collection size under `all_tasks`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::SectorNotFound`] when the sector is missing.
    pub async fn sector(&self, id: SectorId) -> StatsResult<Option<ScopeStats>> {
        let sector = self
            .sectors
            .find_by_id(id)
            .await?
            .ok_or(StatsError::SectorNotFound(id))?;
        let bosses = self.leadership_ids().await?;
        let breakdown = self.sector_breakdown(&sector, bosses).await?;
        Ok(ScopeStats::from_breakdown(&breakdown)
            .map(|stats| stats.with_task_total(breakdown.total)))
    }

    /// Stat entries for every employee of a sector.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::SectorNotFound`] when the sector is missing.
    pub async fn sector_employees(&self, id: SectorId) -> StatsResult<Vec<UserReport>> {
        if self.sectors.find_by_id(id).await?.is_none() {
            return Err(StatsError::SectorNotFound(id));
        }
        let employees = self
            .users
            .list(&UserQuery {
                roles_in: Some(vec![Role::Employee]),
                sector: Some(id),
                ..UserQuery::default()
            })
            .await?;
        self.user_reports(employees).await
    }

    /// User scope: the user's own assigned-task collection.
    ///
    /// A director always yields the all-zero payload by definition.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::UserNotFound`] when the user is missing.
    pub async fn user(&self, id: UserId) -> StatsResult<UserStats> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(StatsError::UserNotFound(id))?;
        self.user_stats(&user).await
    }

    /// Stat entries for every manager.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] when a lookup fails.
    pub async fn managers(&self) -> StatsResult<Vec<UserReport>> {
        let managers = self
            .users
            .list(&UserQuery {
                roles_in: Some(vec![Role::Manager]),
                ..UserQuery::default()
            })
            .await?;
        self.user_reports(managers).await
    }

    /// Stat entries for every user below director level.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] when a lookup fails.
    pub async fn all_users(&self) -> StatsResult<Vec<UserReport>> {
        let users = self
            .users
            .list(&UserQuery {
                exclude_roles: vec![Role::Director, Role::Admin],
                ..UserQuery::default()
            })
            .await?;
        self.user_reports(users).await
    }

    async fn user_stats(&self, user: &User) -> StatsResult<UserStats> {
        if user.role() == Role::Director {
            return Ok(UserStats::empty());
        }
        let tasks = self
            .tasks
            .list(&TaskQuery {
                employee: Some(user.id()),
                ..TaskQuery::default()
            })
            .await?;
        Ok(UserStats::from_breakdown(&StatusBreakdown::from_tasks(
            &tasks,
        )))
    }

    async fn user_reports(&self, users: Vec<User>) -> StatsResult<Vec<UserReport>> {
        let mut reports = Vec::with_capacity(users.len());
        for user in users {
            let stats = self.user_stats(&user).await?;
            reports.push(UserReport {
                user: user.id(),
                first_name: user.profile().first_name().unwrap_or_default().to_owned(),
                last_name: user.profile().last_name().unwrap_or_default().to_owned(),
                stats,
            });
        }
        Ok(reports)
    }

    async fn sector_breakdown(
        &self,
        sector: &Sector,
        bosses: Vec<UserId>,
    ) -> StatsResult<StatusBreakdown> {
        let members = self
            .users
            .list(&UserQuery {
                sector: Some(sector.id()),
                ..UserQuery::default()
            })
            .await?;
        let tasks = self
            .tasks
            .list(&TaskQuery {
                bosses_in: Some(bosses),
                employees_in: Some(members.iter().map(User::id).collect()),
                active_only: true,
                ..TaskQuery::default()
            })
            .await?;
        Ok(StatusBreakdown::from_tasks(&tasks))
    }

    async fn leadership_ids(&self) -> StatsResult<Vec<UserId>> {
        let leaders = self
            .users
            .list(&UserQuery {
                roles_in: Some(vec![Role::Admin, Role::Director]),
                ..UserQuery::default()
            })
            .await?;
        Ok(leaders.iter().map(User::id).collect())
    }
}
