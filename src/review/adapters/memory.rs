//! In-memory repository for review tests and default wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::review::{
    domain::{ReviewId, TaskReview},
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory review repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    state: Arc<RwLock<HashMap<ReviewId, TaskReview>>>,
}

impl InMemoryReviewRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn store(&self, review: &TaskReview) -> ReviewRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&review.id()) {
            return Err(ReviewRepositoryError::DuplicateReview(review.id()));
        }
        state.insert(review.id(), review.clone());
        Ok(())
    }

    async fn update(&self, review: &TaskReview) -> ReviewRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.contains_key(&review.id()) {
            return Err(ReviewRepositoryError::NotFound(review.id()));
        }
        state.insert(review.id(), review.clone());
        Ok(())
    }

    async fn remove(&self, id: ReviewId) -> ReviewRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(ReviewRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: ReviewId) -> ReviewRepositoryResult<Option<TaskReview>> {
        let state = self.state.read().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }

    async fn list_for_task(&self, task: TaskId) -> ReviewRepositoryResult<Vec<TaskReview>> {
        let state = self.state.read().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut reviews: Vec<TaskReview> = state
            .values()
            .filter(|review| review.task() == task)
            .cloned()
            .collect();
        reviews.sort_by_key(TaskReview::created_at);
        Ok(reviews)
    }
}
