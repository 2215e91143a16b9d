//! Role- and ownership-based access policy layer.
//!
//! The policy layer is pure: it inspects the acting user and, for
//! object-level checks, the target aggregate, and never touches storage.
//! Services consult these checks before every mutating or scoped-read
//! operation, passing the authenticated actor explicitly.

mod policy;

pub use policy::{
    AccessDenied, PolicyCheck, RequestKind, admin_or_boss, boss_or_worker, director_or_admin,
    director_or_manager, manager_only, owner_of_review, owner_of_task,
};
