//! Append-only audit records for post-creation task saves.

use super::TaskId;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the task update log.
///
/// Created exactly once per post-creation save of a task — field edits,
/// status toggles, and soft-deletes alike — and never modified or removed
/// independently of the parent task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdateRecord {
    task: TaskId,
    updated_by: UserId,
    recorded_at: DateTime<Utc>,
}

impl TaskUpdateRecord {
    /// Creates a new update record.
    #[must_use]
    pub const fn new(task: TaskId, updated_by: UserId, recorded_at: DateTime<Utc>) -> Self {
        Self {
            task,
            updated_by,
            recorded_at,
        }
    }

    /// Returns the parent task identifier.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the user the save is attributed to.
    #[must_use]
    pub const fn updated_by(&self) -> UserId {
        self.updated_by
    }

    /// Returns when the save was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
