//! Service layer for task creation, lifecycle toggles, and scoped listing.

use crate::access::{self, AccessDenied, RequestKind};
use crate::identity::{
    domain::{Role, SectorId, User, UserId},
    ports::{IdentityRepositoryError, SectorRepository, UserQuery, UserRepository},
};
use crate::task::{
    domain::{
        NewTaskData, StatusToggle, Task, TaskDomainError, TaskEdit, TaskId, TaskUpdateRecord,
        ToggleOutcome,
    },
    ports::{TaskOrdering, TaskQuery, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
///
/// The assigning boss is never taken from the payload: the acting user is
/// always recorded as boss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    problem: String,
    reason: Option<String>,
    event: Option<String>,
    deadline: DateTime<Utc>,
    employee: UserId,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(problem: impl Into<String>, deadline: DateTime<Utc>, employee: UserId) -> Self {
        Self {
            problem: problem.into(),
            reason: None,
            event: None,
            deadline,
            employee,
        }
    }

    /// Sets the background text.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the triggering event.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }
}

/// Date-range and ordering options for scoped task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListFilter {
    /// Keep tasks created on or after this date.
    pub created_from: Option<NaiveDate>,
    /// Keep tasks created on or before this date.
    pub created_to: Option<NaiveDate>,
    /// Listing order; defaults to creation order.
    pub ordering: Option<TaskOrdering>,
}

/// Outcome of a finish/cancel call: the (possibly unchanged) task plus the
/// transition outcome with its caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleReply {
    /// Task after the toggle.
    pub task: Task,
    /// What the toggle did.
    pub outcome: ToggleOutcome,
}

impl ToggleReply {
    /// Returns the caller-facing message for the outcome.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.outcome.message()
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Identity repository operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityRepositoryError),
    /// Access policy check failed.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The referenced sector does not exist.
    #[error("sector not found: {0}")]
    SectorNotFound(SectorId),
    /// A manager assigned outside their own sector.
    #[error("employee {employee} is outside the assigning manager's sector")]
    EmployeeOutsideSector {
        /// Assignee that was rejected.
        employee: UserId,
    },
}

/// Result type for task lifecycle service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, U, S, C>
where
    T: TaskRepository,
    U: UserRepository,
    S: SectorRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    sectors: Arc<S>,
    clock: Arc<C>,
}

impl<T, U, S, C> TaskLifecycleService<T, U, S, C>
where
    T: TaskRepository,
    U: UserRepository,
    S: SectorRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>, sectors: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            sectors,
            clock,
        }
    }

    /// Creates a task assigned by the acting user.
    ///
    /// Directors and managers may create; a manager may only assign to an
    /// employee of their own sector; the deadline must fall strictly after
    /// today.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the actor lacks the capability,
    /// the assignee is missing or out of sector, or validation fails.
    pub async fn create(
        &self,
        actor: &User,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        access::director_or_manager(actor, RequestKind::Mutate)?;
        let employee = self.require_user(request.employee).await?;
        if actor.role() == Role::Manager && employee.sector() != actor.sector() {
            return Err(TaskServiceError::EmployeeOutsideSector {
                employee: employee.id(),
            });
        }
        let task = Task::new(
            NewTaskData {
                problem: request.problem,
                reason: request.reason,
                event: request.event,
                deadline: request.deadline,
                boss: actor.id(),
                employee: employee.id(),
            },
            &*self.clock,
        )?;
        self.tasks.store(&task).await?;
        Ok(task)
    }

    /// Retrieves an active task. Permitted to the task's boss or a global
    /// admin. Soft-deleted tasks are reported as missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when absent or
    /// [`TaskServiceError::Forbidden`] when the actor may not see it.
    pub async fn get(&self, actor: &User, id: TaskId) -> TaskServiceResult<Task> {
        let task = self.require_active_task(id).await?;
        access::admin_or_boss(actor, &task)?;
        Ok(task)
    }

    /// Applies a partial edit. Permitted to the task's boss or a global
    /// admin; the save appends one update record attributed to the boss.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task or a replacement assignee
    /// is missing, the actor lacks the capability, or validation fails.
    pub async fn update(
        &self,
        actor: &User,
        id: TaskId,
        edit: TaskEdit,
    ) -> TaskServiceResult<Task> {
        let mut task = self.require_active_task(id).await?;
        access::admin_or_boss(actor, &task)?;
        if let Some(employee) = edit.employee {
            let employee = self.require_user(employee).await?;
            if actor.role() == Role::Manager && employee.sector() != actor.sector() {
                return Err(TaskServiceError::EmployeeOutsideSector {
                    employee: employee.id(),
                });
            }
        }
        task.edit(edit, &*self.clock)?;
        self.tasks.update(&task, task.boss()).await?;
        Ok(task)
    }

    /// Soft-deletes a task. Permitted to the task's boss or a global admin.
    ///
    /// The deactivation goes through the generic update path and therefore
    /// appends an update record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError`] when the task is missing or the actor
    /// lacks the capability.
    pub async fn remove(&self, actor: &User, id: TaskId) -> TaskServiceResult<()> {
        let mut task = self.require_active_task(id).await?;
        access::admin_or_boss(actor, &task)?;
        task.deactivate(&*self.clock);
        self.tasks.update(&task, task.boss()).await?;
        Ok(())
    }

    /// Completes a `doing` task or reopens a `finished` one.
    ///
    /// Permitted to the task's boss or its employee. Refusals (canceled or
    /// missed tasks) are successful no-ops carrying a message.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is missing,
    /// [`TaskServiceError::Forbidden`] for other users, or a repository
    /// error when a concurrent toggle wins the race.
    pub async fn finish(&self, actor: &User, id: TaskId) -> TaskServiceResult<ToggleReply> {
        self.toggle(actor, id, StatusToggle::Finish).await
    }

    /// Withdraws a `doing` task or reopens a `canceled` one.
    ///
    /// Permitted to the task's boss or its employee. Refusals (finished or
    /// missed tasks) are successful no-ops carrying a message.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is missing,
    /// [`TaskServiceError::Forbidden`] for other users, or a repository
    /// error when a concurrent toggle wins the race.
    pub async fn cancel(&self, actor: &User, id: TaskId) -> TaskServiceResult<ToggleReply> {
        self.toggle(actor, id, StatusToggle::Cancel).await
    }

    /// Returns a task's update log, oldest first. Permitted to the task's
    /// boss or its employee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is missing or
    /// [`TaskServiceError::Forbidden`] for other users.
    pub async fn update_history(
        &self,
        actor: &User,
        id: TaskId,
    ) -> TaskServiceResult<Vec<TaskUpdateRecord>> {
        let task = self.require_task(id).await?;
        access::boss_or_worker(actor, &task)?;
        Ok(self.tasks.update_history(id).await?)
    }

    /// Lists every active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn list_active(
        &self,
        actor: &User,
        filter: TaskListFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        access::director_or_manager(actor, RequestKind::Read)?;
        let query = scoped_query(filter, TaskQuery {
            active_only: true,
            ..TaskQuery::default()
        });
        Ok(self.tasks.list(&query).await?)
    }

    /// Lists the active tasks the acting manager personally assigned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-managers.
    pub async fn list_for_manager(&self, actor: &User) -> TaskServiceResult<Vec<Task>> {
        access::manager_only(actor)?;
        let query = TaskQuery {
            boss: Some(actor.id()),
            active_only: true,
            ..TaskQuery::default()
        };
        Ok(self.tasks.list(&query).await?)
    }

    /// Lists active tasks originated above sector level: everything except
    /// manager-assigned tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for managers and employees.
    pub async fn list_for_director(&self, actor: &User) -> TaskServiceResult<Vec<Task>> {
        access::director_or_admin(actor)?;
        let managers = self.user_ids_with_roles(&[Role::Manager]).await?;
        let query = TaskQuery {
            bosses_not_in: Some(managers),
            active_only: true,
            ..TaskQuery::default()
        };
        Ok(self.tasks.list(&query).await?)
    }

    /// Lists active tasks assigned from within a sector.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::SectorNotFound`] when the sector is
    /// missing.
    pub async fn list_for_sector(
        &self,
        sector: SectorId,
        filter: TaskListFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        if self.sectors.find_by_id(sector).await?.is_none() {
            return Err(TaskServiceError::SectorNotFound(sector));
        }
        let members = self
            .users
            .list(&UserQuery {
                sector: Some(sector),
                ..UserQuery::default()
            })
            .await?;
        let query = scoped_query(filter, TaskQuery {
            bosses_in: Some(members.iter().map(User::id).collect()),
            active_only: true,
            ..TaskQuery::default()
        });
        Ok(self.tasks.list(&query).await?)
    }

    /// Lists the tasks a user received from managers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserNotFound`] when the user is missing.
    pub async fn assigned_by_managers(
        &self,
        user: UserId,
        filter: TaskListFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        self.assigned_by_roles(user, &[Role::Manager], filter).await
    }

    /// Lists the tasks a user received from directors or admins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserNotFound`] when the user is missing.
    pub async fn assigned_by_directors(
        &self,
        user: UserId,
        filter: TaskListFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        self.assigned_by_roles(user, &[Role::Director, Role::Admin], filter)
            .await
    }

    async fn assigned_by_roles(
        &self,
        user: UserId,
        roles: &[Role],
        filter: TaskListFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        self.require_user(user).await?;
        let bosses = self.user_ids_with_roles(roles).await?;
        let query = scoped_query(filter, TaskQuery {
            employee: Some(user),
            bosses_in: Some(bosses),
            ..TaskQuery::default()
        });
        Ok(self.tasks.list(&query).await?)
    }

    async fn toggle(
        &self,
        actor: &User,
        id: TaskId,
        toggle: StatusToggle,
    ) -> TaskServiceResult<ToggleReply> {
        let mut task = self.require_task(id).await?;
        access::boss_or_worker(actor, &task)?;
        let expected = task.status();
        let outcome = task.apply_toggle(toggle, &*self.clock);
        if outcome.is_applied() {
            self.tasks
                .update_transition(&task, expected, task.boss())
                .await?;
        }
        Ok(ToggleReply { task, outcome })
    }

    async fn user_ids_with_roles(&self, roles: &[Role]) -> TaskServiceResult<Vec<UserId>> {
        let users = self
            .users
            .list(&UserQuery {
                roles_in: Some(roles.to_vec()),
                ..UserQuery::default()
            })
            .await?;
        Ok(users.iter().map(User::id).collect())
    }

    async fn require_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    // Detail read/update/delete see active tasks only; the toggles
    // deliberately fetch without the active filter.
    async fn require_active_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        let task = self.require_task(id).await?;
        if !task.is_active() {
            return Err(TaskServiceError::NotFound(id));
        }
        Ok(task)
    }

    async fn require_user(&self, id: UserId) -> TaskServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::UserNotFound(id))
    }
}

fn scoped_query(filter: TaskListFilter, base: TaskQuery) -> TaskQuery {
    TaskQuery {
        created_from: filter.created_from,
        created_to: filter.created_to,
        ordering: filter.ordering,
        ..base
    }
}
