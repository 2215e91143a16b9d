//! Users, roles, and sector hierarchy.
//!
//! The identity context models the organizational structure the rest of the
//! system builds on: a closed role enumeration, sector grouping entities,
//! and user records whose sector membership is tied to their role. The
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
