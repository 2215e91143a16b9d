//! Capability checks consulted before scoped-read and mutating operations.
//!
//! Each check is a total function over the closed [`Role`] enumeration and
//! returns a typed [`AccessDenied`] naming the failed check. Operations that
//! require several checks combine them with `?` (logical AND).

use crate::identity::domain::{Role, User};
use crate::review::domain::TaskReview;
use crate::task::domain::Task;
use std::fmt;
use thiserror::Error;

/// Classification of an operation for checks that exempt pure reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Read-only operation.
    Read,
    /// State-changing operation.
    Mutate,
}

/// Named capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyCheck {
    /// Director or manager, with reads exempted.
    DirectorOrManager,
    /// Manager exclusively.
    ManagerOnly,
    /// Director or global admin.
    DirectorOrAdmin,
    /// The task's assigning boss.
    OwnerOfTask,
    /// The review's author.
    OwnerOfReview,
    /// The task's boss or its assigned employee.
    BossOrWorker,
    /// The task's boss or a global admin.
    AdminOrBoss,
}

impl PolicyCheck {
    /// Returns the canonical check name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DirectorOrManager => "director-or-manager",
            Self::ManagerOnly => "manager-only",
            Self::DirectorOrAdmin => "director-or-admin",
            Self::OwnerOfTask => "owner-of-task",
            Self::OwnerOfReview => "owner-of-review",
            Self::BossOrWorker => "boss-or-worker",
            Self::AdminOrBoss => "admin-or-boss",
        }
    }
}

impl fmt::Display for PolicyCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability check rejected the acting user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("permission denied: {check} rejected {role} user")]
pub struct AccessDenied {
    /// Check that failed.
    pub check: PolicyCheck,
    /// Role of the rejected user.
    pub role: Role,
}

const fn denied(check: PolicyCheck, role: Role) -> AccessDenied {
    AccessDenied { check, role }
}

/// Directors and managers may mutate; anyone may read.
///
/// # Errors
///
/// Returns [`AccessDenied`] for admins and employees on mutating requests.
pub fn director_or_manager(actor: &User, kind: RequestKind) -> Result<(), AccessDenied> {
    match (actor.role(), kind) {
        (Role::Director | Role::Manager, _) | (_, RequestKind::Read) => Ok(()),
        (role @ (Role::Admin | Role::Employee), RequestKind::Mutate) => {
            Err(denied(PolicyCheck::DirectorOrManager, role))
        }
    }
}

/// Managers exclusively.
///
/// # Errors
///
/// Returns [`AccessDenied`] for every other role.
pub fn manager_only(actor: &User) -> Result<(), AccessDenied> {
    match actor.role() {
        Role::Manager => Ok(()),
        role @ (Role::Admin | Role::Director | Role::Employee) => {
            Err(denied(PolicyCheck::ManagerOnly, role))
        }
    }
}

/// Directors and global admins.
///
/// # Errors
///
/// Returns [`AccessDenied`] for managers and employees.
pub fn director_or_admin(actor: &User) -> Result<(), AccessDenied> {
    match actor.role() {
        Role::Director | Role::Admin => Ok(()),
        role @ (Role::Manager | Role::Employee) => {
            Err(denied(PolicyCheck::DirectorOrAdmin, role))
        }
    }
}

/// The task's assigning boss.
///
/// # Errors
///
/// Returns [`AccessDenied`] for everyone else.
pub fn owner_of_task(actor: &User, task: &Task) -> Result<(), AccessDenied> {
    if task.boss() == actor.id() {
        return Ok(());
    }
    Err(denied(PolicyCheck::OwnerOfTask, actor.role()))
}

/// The review's author.
///
/// # Errors
///
/// Returns [`AccessDenied`] for everyone else.
pub fn owner_of_review(actor: &User, review: &TaskReview) -> Result<(), AccessDenied> {
    if review.author() == actor.id() {
        return Ok(());
    }
    Err(denied(PolicyCheck::OwnerOfReview, actor.role()))
}

/// The task's boss or its assigned employee.
///
/// # Errors
///
/// Returns [`AccessDenied`] for everyone else.
pub fn boss_or_worker(actor: &User, task: &Task) -> Result<(), AccessDenied> {
    if task.boss() == actor.id() || task.employee() == actor.id() {
        return Ok(());
    }
    Err(denied(PolicyCheck::BossOrWorker, actor.role()))
}

/// The task's boss or a global admin.
///
/// # Errors
///
/// Returns [`AccessDenied`] for everyone else.
pub fn admin_or_boss(actor: &User, task: &Task) -> Result<(), AccessDenied> {
    if task.boss() == actor.id() {
        return Ok(());
    }
    match actor.role() {
        Role::Admin => Ok(()),
        role @ (Role::Director | Role::Manager | Role::Employee) => {
            Err(denied(PolicyCheck::AdminOrBoss, role))
        }
    }
}
