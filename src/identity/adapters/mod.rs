//! Adapter implementations of the identity ports.

pub mod memory;

pub use memory::{InMemorySectorRepository, InMemoryUserRepository};
