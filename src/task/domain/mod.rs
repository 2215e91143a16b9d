//! Domain model for the task lifecycle.
//!
//! The task domain owns the status state machine with its toggle-style
//! transition rules, the task aggregate with creation and edit validation,
//! and the append-only update log records.

mod error;
mod ids;
mod status;
mod task;
mod update_log;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::{StatusToggle, TaskStatus, ToggleOutcome, ToggleRefusal};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskEdit};
pub use update_log::TaskUpdateRecord;
