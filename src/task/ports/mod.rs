//! Port contracts for task lifecycle management.

pub mod repository;

pub use repository::{
    SortDirection, TaskOrdering, TaskQuery, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult, TaskSortKey,
};
