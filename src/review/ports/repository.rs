//! Repository port for review persistence.

use crate::review::domain::{ReviewId, TaskReview};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// A review with the same identifier already exists.
    #[error("duplicate review identifier: {0}")]
    DuplicateReview(ReviewId),

    /// The review was not found.
    #[error("review not found: {0}")]
    NotFound(ReviewId),

    /// Persistence-layer failure, kept distinct from missing records.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Review persistence contract.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Stores a new review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::DuplicateReview`] when the review
    /// ID already exists.
    async fn store(&self, review: &TaskReview) -> ReviewRepositoryResult<()>;

    /// Persists changes to an existing review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::NotFound`] when the review does not
    /// exist.
    async fn update(&self, review: &TaskReview) -> ReviewRepositoryResult<()>;

    /// Removes a review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::NotFound`] when the review does not
    /// exist.
    async fn remove(&self, id: ReviewId) -> ReviewRepositoryResult<()>;

    /// Finds a review by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: ReviewId) -> ReviewRepositoryResult<Option<TaskReview>>;

    /// Lists the reviews of a task, oldest first.
    async fn list_for_task(&self, task: TaskId) -> ReviewRepositoryResult<Vec<TaskReview>>;
}
