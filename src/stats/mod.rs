//! Status-distribution statistics.
//!
//! One aggregation routine runs over whatever task collection a scope
//! resolves to: global (leadership-assigned tasks), per-sector, or
//! per-user. Scope payloads collapse to an empty object when the
//! collection is empty; user payloads zero every metric instead.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
