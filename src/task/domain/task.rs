//! Task aggregate root.

use super::{StatusToggle, TaskDomainError, TaskId, TaskStatus, ToggleOutcome};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Problem statement; must be non-empty.
    pub problem: String,
    /// Optional background for the assignment.
    pub reason: Option<String>,
    /// Optional triggering event.
    pub event: Option<String>,
    /// Completion deadline; must fall strictly after the creation date.
    pub deadline: DateTime<Utc>,
    /// Assigning user.
    pub boss: UserId,
    /// Assigned employee.
    pub employee: UserId,
}

/// Partial task edit; only set fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// Replacement problem statement.
    pub problem: Option<String>,
    /// Replacement background text.
    pub reason: Option<String>,
    /// Replacement triggering event.
    pub event: Option<String>,
    /// Replacement deadline; re-validated against the edit date.
    pub deadline: Option<DateTime<Utc>>,
    /// Replacement assignee.
    pub employee: Option<UserId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted problem statement.
    pub problem: String,
    /// Persisted background text, if any.
    pub reason: Option<String>,
    /// Persisted triggering event, if any.
    pub event: Option<String>,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted assigning user.
    pub boss: UserId,
    /// Persisted assignee.
    pub employee: UserId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted financial-help flag.
    pub financial_help: bool,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted dirty flag.
    pub is_changed: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    problem: String,
    reason: Option<String>,
    event: Option<String>,
    deadline: DateTime<Utc>,
    boss: UserId,
    employee: UserId,
    status: TaskStatus,
    financial_help: bool,
    is_active: bool,
    is_changed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl Task {
    /// Creates a new task in the `doing` status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProblem`] when the problem statement
    /// is blank, or [`TaskDomainError::DeadlineNotInFuture`] when the
    /// deadline date is not strictly after the creation date.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let problem = data.problem.trim().to_owned();
        if problem.is_empty() {
            return Err(TaskDomainError::EmptyProblem);
        }
        let timestamp = clock.utc();
        validate_deadline(data.deadline, timestamp)?;

        Ok(Self {
            id: TaskId::new(),
            problem,
            reason: normalized(data.reason),
            event: normalized(data.event),
            deadline: data.deadline,
            boss: data.boss,
            employee: data.employee,
            status: TaskStatus::Doing,
            financial_help: false,
            is_active: true,
            is_changed: false,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            problem: data.problem,
            reason: data.reason,
            event: data.event,
            deadline: data.deadline,
            boss: data.boss,
            employee: data.employee,
            status: data.status,
            financial_help: data.financial_help,
            is_active: data.is_active,
            is_changed: data.is_changed,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the problem statement.
    #[must_use]
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Returns the background text, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the triggering event, if any.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the assigning user.
    #[must_use]
    pub const fn boss(&self) -> UserId {
        self.boss
    }

    /// Returns the assigned employee.
    #[must_use]
    pub const fn employee(&self) -> UserId {
        self.employee
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Whether financial help is attached. System-managed; never set
    /// through the public edit path.
    #[must_use]
    pub const fn financial_help(&self) -> bool {
        self.financial_help
    }

    /// Whether the task is active (not soft-deleted).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the task carries the dirty flag.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.is_changed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total allotted days, from creation date to deadline date.
    #[must_use]
    pub fn all_days(&self) -> i64 {
        (self.deadline.date_naive() - self.created_at.date_naive()).num_days()
    }

    /// Days remaining until the deadline; negative once it has passed.
    #[must_use]
    pub fn remain_days(&self, clock: &impl Clock) -> i64 {
        (self.deadline.date_naive() - clock.utc().date_naive()).num_days()
    }

    /// Applies a partial edit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProblem`] when a blank problem
    /// replacement is given, or [`TaskDomainError::DeadlineNotInFuture`]
    /// when a replacement deadline is not strictly after the edit date.
    pub fn edit(&mut self, edit: TaskEdit, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let timestamp = clock.utc();
        let problem = edit
            .problem
            .map(|problem| {
                let problem = problem.trim().to_owned();
                if problem.is_empty() {
                    return Err(TaskDomainError::EmptyProblem);
                }
                Ok(problem)
            })
            .transpose()?;
        if let Some(deadline) = edit.deadline {
            validate_deadline(deadline, timestamp)?;
        }

        if let Some(problem) = problem {
            self.problem = problem;
        }
        if let Some(deadline) = edit.deadline {
            self.deadline = deadline;
        }
        if edit.reason.is_some() {
            self.reason = normalized(edit.reason);
        }
        if edit.event.is_some() {
            self.event = normalized(edit.event);
        }
        if let Some(employee) = edit.employee {
            self.employee = employee;
        }
        self.updated_at = timestamp;
        Ok(())
    }

    /// Applies a finish/cancel toggle to the status.
    ///
    /// On an applied transition the status and `updated_at` change; a
    /// refusal leaves the aggregate untouched.
    pub fn apply_toggle(&mut self, toggle: StatusToggle, clock: &impl Clock) -> ToggleOutcome {
        let outcome = self.status.apply(toggle);
        if let ToggleOutcome::Applied { to, .. } = outcome {
            self.status = to;
            self.touch(clock);
        }
        outcome
    }

    /// Soft-deletes the task, dropping it from every scoped list.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_deadline(
    deadline: DateTime<Utc>,
    reference: DateTime<Utc>,
) -> Result<(), TaskDomainError> {
    // Date granularity: a deadline later the same day still fails.
    if deadline.date_naive() <= reference.date_naive() {
        return Err(TaskDomainError::DeadlineNotInFuture {
            deadline: deadline.date_naive(),
            today: reference.date_naive(),
        });
    }
    Ok(())
}
