//! Port contracts for review persistence.

pub mod repository;

pub use repository::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult};
