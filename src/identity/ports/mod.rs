//! Port contracts for identity persistence.

pub mod repository;

pub use repository::{
    IdentityRepositoryError, IdentityRepositoryResult, SectorRepository, UserQuery, UserRepository,
};
