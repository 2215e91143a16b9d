//! Task status values and the toggle-style transition rules.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work is in progress. Initial status of every task.
    Doing,
    /// Work has been completed.
    Finished,
    /// The assignment was withdrawn.
    Canceled,
    /// The deadline elapsed. Set by an external sweep, never by a toggle.
    Missed,
    /// Reserved status; no transition currently produces it.
    Changed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doing => "doing",
            Self::Finished => "finished",
            Self::Canceled => "canceled",
            Self::Missed => "missed",
            Self::Changed => "changed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "doing" => Ok(Self::Doing),
            "finished" => Ok(Self::Finished),
            "canceled" => Ok(Self::Canceled),
            "missed" => Ok(Self::Missed),
            "changed" => Ok(Self::Changed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two toggle operations exposed to bosses and workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusToggle {
    /// Complete a task, or reopen a finished one.
    Finish,
    /// Withdraw a task, or reopen a canceled one.
    Cancel,
}

/// Reason a toggle left the status untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRefusal {
    /// Cancel was invoked on a finished task.
    AlreadyFinished,
    /// Finish was invoked on a canceled task.
    AlreadyCanceled,
    /// The task is past its deadline.
    DeadlinePassed,
}

/// Result of applying a toggle to a status.
///
/// Refusals are successful no-ops carrying a message, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The toggle changed the status.
    Applied {
        /// Status before the toggle.
        from: TaskStatus,
        /// Status after the toggle.
        to: TaskStatus,
    },
    /// The toggle left the status untouched.
    Refused(ToggleRefusal),
}

impl ToggleOutcome {
    /// Returns the caller-facing message for this outcome.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Applied {
                to: TaskStatus::Finished,
                ..
            } => "task completed",
            Self::Applied {
                to: TaskStatus::Canceled,
                ..
            } => "task canceled",
            Self::Applied { .. } => "task is active again",
            Self::Refused(ToggleRefusal::AlreadyFinished) => "task already finished",
            Self::Refused(ToggleRefusal::AlreadyCanceled) => {
                "task already canceled, cannot finish"
            }
            Self::Refused(ToggleRefusal::DeadlinePassed) => "task deadline has passed",
        }
    }

    /// Whether the toggle changed the status.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

impl TaskStatus {
    /// Applies a toggle, returning the resulting outcome.
    ///
    /// Both toggles form idempotent pairs around `doing`: finishing a
    /// finished task reopens it, canceling a canceled task reopens it. A
    /// missed task refuses both toggles; the reserved `changed` status
    /// behaves like `missed` here.
    #[must_use]
    pub const fn apply(self, toggle: StatusToggle) -> ToggleOutcome {
        match (toggle, self) {
            (StatusToggle::Finish, Self::Doing) => ToggleOutcome::Applied {
                from: Self::Doing,
                to: Self::Finished,
            },
            (StatusToggle::Finish, Self::Finished) => ToggleOutcome::Applied {
                from: Self::Finished,
                to: Self::Doing,
            },
            (StatusToggle::Finish, Self::Canceled) => {
                ToggleOutcome::Refused(ToggleRefusal::AlreadyCanceled)
            }
            (StatusToggle::Cancel, Self::Doing) => ToggleOutcome::Applied {
                from: Self::Doing,
                to: Self::Canceled,
            },
            (StatusToggle::Cancel, Self::Canceled) => ToggleOutcome::Applied {
                from: Self::Canceled,
                to: Self::Doing,
            },
            (StatusToggle::Cancel, Self::Finished) => {
                ToggleOutcome::Refused(ToggleRefusal::AlreadyFinished)
            }
            (_, Self::Missed | Self::Changed) => {
                ToggleOutcome::Refused(ToggleRefusal::DeadlinePassed)
            }
        }
    }
}
