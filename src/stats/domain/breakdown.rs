//! Status-distribution aggregation over task collections.
//!
//! One routine counts any task collection; the two payload types encode the
//! two empty-collection policies the reporting contract requires: scope
//! payloads disappear entirely (serialized as `{}`), user payloads zero
//! every metric.

use crate::task::domain::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// Per-status counts over a task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    /// Collection size.
    pub total: u64,
    /// Tasks in the `doing` status.
    pub doing: u64,
    /// Tasks in the `finished` status.
    pub finished: u64,
    /// Tasks in the `canceled` status.
    pub canceled: u64,
    /// Tasks in the `missed` status.
    pub missed: u64,
    /// Tasks carrying the `is_changed` dirty flag, regardless of status.
    pub changed: u64,
}

impl StatusBreakdown {
    /// Counts statuses across a task collection.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut breakdown = Self {
            total: tasks.len() as u64,
            ..Self::default()
        };
        for task in tasks {
            match task.status() {
                TaskStatus::Doing => breakdown.doing += 1,
                TaskStatus::Finished => breakdown.finished += 1,
                TaskStatus::Canceled => breakdown.canceled += 1,
                TaskStatus::Missed => breakdown.missed += 1,
                TaskStatus::Changed => {}
            }
            if task.is_changed() {
                breakdown.changed += 1;
            }
        }
        breakdown
    }

    /// Whether the collection was empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Raw percentage of the total, without rounding.
    #[must_use]
    pub fn percent_of(&self, count: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }
}

/// Scope-level statistics payload (global and sector scopes).
///
/// Serialized only for non-empty scopes; [`scope_payload`] renders the
/// empty scope as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeStats {
    /// Sector name, present on per-sector payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Collection size, present on single-sector payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_tasks: Option<u64>,
    /// Count of `doing` tasks.
    pub doing: u64,
    /// Count of `finished` tasks.
    pub finished: u64,
    /// Count of `canceled` tasks.
    pub canceled: u64,
    /// Count of `missed` tasks.
    pub missed: u64,
    /// Count of dirty-flagged tasks.
    pub changed: u64,
    /// Percentage of `doing` tasks.
    pub p_doing: f64,
    /// Percentage of `finished` tasks.
    pub p_finished: f64,
    /// Percentage of `canceled` tasks.
    pub p_canceled: f64,
    /// Percentage of `missed` tasks.
    pub p_missed: f64,
    /// Percentage of dirty-flagged tasks.
    pub p_changed: f64,
}

impl ScopeStats {
    /// Builds the scope payload, or `None` for an empty collection.
    #[must_use]
    pub fn from_breakdown(breakdown: &StatusBreakdown) -> Option<Self> {
        if breakdown.is_empty() {
            return None;
        }
        Some(Self {
            sector: None,
            all_tasks: None,
            doing: breakdown.doing,
            finished: breakdown.finished,
            canceled: breakdown.canceled,
            missed: breakdown.missed,
            changed: breakdown.changed,
            p_doing: breakdown.percent_of(breakdown.doing),
            p_finished: breakdown.percent_of(breakdown.finished),
            p_canceled: breakdown.percent_of(breakdown.canceled),
            p_missed: breakdown.percent_of(breakdown.missed),
            p_changed: breakdown.percent_of(breakdown.changed),
        })
    }

    /// Attaches the sector name carried by per-sector payloads.
    #[must_use]
    pub fn with_sector(mut self, name: impl Into<String>) -> Self {
        self.sector = Some(name.into());
        self
    }

    /// Attaches the collection size carried by single-sector payloads.
    #[must_use]
    pub const fn with_task_total(mut self, total: u64) -> Self {
        self.all_tasks = Some(total);
        self
    }
}

/// Renders a scope-level aggregate, yielding `{}` for an empty scope.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] when serialization fails.
pub fn scope_payload(stats: Option<&ScopeStats>) -> Result<serde_json::Value, serde_json::Error> {
    stats.map_or_else(
        || Ok(serde_json::Value::Object(serde_json::Map::new())),
        serde_json::to_value,
    )
}

/// User-level statistics payload.
///
/// An empty collection zeroes every metric rather than omitting the
/// payload. The changed-task percentage is serialized under the key
/// `changed` — a historical quirk of the reporting contract, kept for
/// output parity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Collection size.
    pub total: u64,
    /// Count of `doing` tasks.
    pub doing: u64,
    /// Count of `finished` tasks.
    pub finished: u64,
    /// Count of `canceled` tasks.
    pub canceled: u64,
    /// Count of `missed` tasks.
    pub missed: u64,
    /// Percentage of `doing` tasks.
    pub p_doing: f64,
    /// Percentage of `finished` tasks.
    pub p_finished: f64,
    /// Percentage of `canceled` tasks.
    pub p_canceled: f64,
    /// Percentage of `missed` tasks.
    pub p_missed: f64,
    /// Percentage of dirty-flagged tasks, under the historical key.
    pub changed: f64,
}

impl UserStats {
    /// Builds the user payload; an empty collection yields all zeroes.
    #[must_use]
    pub fn from_breakdown(breakdown: &StatusBreakdown) -> Self {
        Self {
            total: breakdown.total,
            doing: breakdown.doing,
            finished: breakdown.finished,
            canceled: breakdown.canceled,
            missed: breakdown.missed,
            p_doing: breakdown.percent_of(breakdown.doing),
            p_finished: breakdown.percent_of(breakdown.finished),
            p_canceled: breakdown.percent_of(breakdown.canceled),
            p_missed: breakdown.percent_of(breakdown.missed),
            changed: breakdown.percent_of(breakdown.changed),
        }
    }

    /// The all-zero payload, used for roles that never accumulate stats.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
