//! Repository port for task persistence, scoped queries, and auditing.

use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus, TaskUpdateRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A concurrent save changed the status between read and write.
    #[error("task {task} status changed concurrently: expected {expected}, found {actual}")]
    StatusConflict {
        /// Task whose transition was rejected.
        task: TaskId,
        /// Status the caller read before transitioning.
        expected: TaskStatus,
        /// Status found in the store at write time.
        actual: TaskStatus,
    },

    /// Persistence-layer failure, kept distinct from missing records.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Field a task listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortKey {
    /// Creation timestamp.
    CreatedAt,
    /// Latest modification timestamp.
    UpdatedAt,
    /// Completion deadline.
    Deadline,
    /// Lifecycle status, by canonical name.
    Status,
}

/// Listing order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering applied to a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOrdering {
    /// Field to order by.
    pub key: TaskSortKey,
    /// Order direction.
    pub direction: SortDirection,
}

/// Filter predicates for task listing.
///
/// Role- and sector-level scoping is resolved by services into explicit
/// user-id sets before reaching the store, so the store only ever filters
/// on its own columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to tasks assigned by this boss.
    pub boss: Option<UserId>,
    /// Restrict to tasks whose boss is in the set.
    pub bosses_in: Option<Vec<UserId>>,
    /// Exclude tasks whose boss is in the set.
    pub bosses_not_in: Option<Vec<UserId>>,
    /// Restrict to tasks assigned to this employee.
    pub employee: Option<UserId>,
    /// Restrict to tasks whose employee is in the set.
    pub employees_in: Option<Vec<UserId>>,
    /// Restrict to tasks with this status.
    pub status: Option<TaskStatus>,
    /// Drop soft-deleted tasks.
    pub active_only: bool,
    /// Restrict to tasks created on or after this date.
    pub created_from: Option<NaiveDate>,
    /// Restrict to tasks created on or before this date.
    pub created_to: Option<NaiveDate>,
    /// Listing order; defaults to creation order.
    pub ordering: Option<TaskOrdering>,
}

/// Task persistence contract.
///
/// Every mutation of an existing task appends one [`TaskUpdateRecord`] in
/// the same atomic store operation as the save.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task. Creation appends no update record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task and appends one update record
    /// attributed to `updated_by`, stamped with the task's `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task, updated_by: UserId) -> TaskRepositoryResult<()>;

    /// Persists a status transition with compare-and-swap semantics.
    ///
    /// The save is applied only when the stored status still equals
    /// `expected`; otherwise the concurrent winner is preserved and a
    /// conflict is reported. On success one update record is appended, as
    /// with [`TaskRepository::update`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist or [`TaskRepositoryError::StatusConflict`] when the stored
    /// status no longer matches `expected`.
    async fn update_transition(
        &self,
        task: &Task,
        expected: TaskStatus,
        updated_by: UserId,
    ) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching the query.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the update log of a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update_history(&self, id: TaskId) -> TaskRepositoryResult<Vec<TaskUpdateRecord>>;
}
