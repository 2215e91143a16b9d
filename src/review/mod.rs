//! Review comments attached to tasks.
//!
//! Reviews let the boss and the assigned worker discuss a task. Content is
//! validated non-empty, authorship is forced to the acting user, and only
//! the author may read back, edit, or delete an individual review. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
