//! Domain model for statistics aggregation.

mod breakdown;

pub use breakdown::{ScopeStats, StatusBreakdown, UserStats, scope_payload};
