//! Service layer for adding and moderating task reviews.

use crate::access::{self, AccessDenied};
use crate::identity::domain::User;
use crate::review::{
    domain::{ReviewContent, ReviewDomainError, ReviewId, TaskReview},
    ports::{ReviewRepository, ReviewRepositoryError},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for adding a review to a task.
///
/// The author is never taken from the payload: the acting user is always
/// recorded as author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReviewRequest {
    task: TaskId,
    content: String,
    reply: Option<ReviewId>,
}

impl AddReviewRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(task: TaskId, content: impl Into<String>) -> Self {
        Self {
            task,
            content: content.into(),
            reply: None,
        }
    }

    /// Marks the review as a reply to an earlier review of the same task.
    #[must_use]
    pub const fn with_reply(mut self, reply: ReviewId) -> Self {
        self.reply = Some(reply);
        self
    }
}

/// Service-level errors for review operations.
#[derive(Debug, Error)]
pub enum ReviewServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),
    /// Review repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReviewRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Access policy check failed.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    /// The referenced review does not exist.
    #[error("review not found: {0}")]
    NotFound(ReviewId),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The reply target does not exist.
    #[error("reply target not found: {0}")]
    ReplyNotFound(ReviewId),
    /// The reply target belongs to a different task.
    #[error("reply target {reply} belongs to a different task than {task}")]
    ReplyOutsideTask {
        /// Reply target that was rejected.
        reply: ReviewId,
        /// Task the new review was addressed to.
        task: TaskId,
    },
}

/// Result type for review service operations.
pub type ReviewServiceResult<T> = Result<T, ReviewServiceError>;

/// Review orchestration service.
#[derive(Clone)]
pub struct ReviewService<R, T, C>
where
    R: ReviewRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    reviews: Arc<R>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> ReviewService<R, T, C>
where
    R: ReviewRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new review service.
    #[must_use]
    pub const fn new(reviews: Arc<R>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            reviews,
            tasks,
            clock,
        }
    }

    /// Adds a review authored by the acting user.
    ///
    /// Permitted to the task's boss or its employee. A reply must reference
    /// an existing review of the same task.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError`] when the task or reply target is
    /// missing, the actor lacks the capability, or the content is empty.
    pub async fn add(
        &self,
        actor: &User,
        request: AddReviewRequest,
    ) -> ReviewServiceResult<TaskReview> {
        let task = self.require_task(request.task).await?;
        access::boss_or_worker(actor, &task)?;
        let content = ReviewContent::new(request.content)?;
        if let Some(reply) = request.reply {
            let target = self
                .reviews
                .find_by_id(reply)
                .await?
                .ok_or(ReviewServiceError::ReplyNotFound(reply))?;
            if target.task() != task.id() {
                return Err(ReviewServiceError::ReplyOutsideTask {
                    reply,
                    task: task.id(),
                });
            }
        }
        let review = TaskReview::new(task.id(), actor.id(), content, request.reply, &*self.clock);
        self.reviews.store(&review).await?;
        Ok(review)
    }

    /// Lists the reviews of a task, oldest first.
    ///
    /// Permitted to the task's boss or its employee.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::TaskNotFound`] when the task is
    /// missing or [`ReviewServiceError::Forbidden`] for other users.
    pub async fn list_for_task(
        &self,
        actor: &User,
        task: TaskId,
    ) -> ReviewServiceResult<Vec<TaskReview>> {
        let task = self.require_task(task).await?;
        access::boss_or_worker(actor, &task)?;
        Ok(self.reviews.list_for_task(task.id()).await?)
    }

    /// Retrieves a single review. Permitted to its author only.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::NotFound`] when absent or
    /// [`ReviewServiceError::Forbidden`] for non-authors.
    pub async fn get(&self, actor: &User, id: ReviewId) -> ReviewServiceResult<TaskReview> {
        let review = self.require_review(id).await?;
        access::owner_of_review(actor, &review)?;
        Ok(review)
    }

    /// Replaces a review's content wholesale. Permitted to its author only.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError`] when the review is missing, the actor
    /// is not the author, or the replacement content is empty.
    pub async fn update_content(
        &self,
        actor: &User,
        id: ReviewId,
        content: impl Into<String>,
    ) -> ReviewServiceResult<TaskReview> {
        let mut review = self.require_review(id).await?;
        access::owner_of_review(actor, &review)?;
        review.replace_content(ReviewContent::new(content)?, &*self.clock);
        self.reviews.update(&review).await?;
        Ok(review)
    }

    /// Deletes a review. Permitted to its author only.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::NotFound`] when absent or
    /// [`ReviewServiceError::Forbidden`] for non-authors.
    pub async fn remove(&self, actor: &User, id: ReviewId) -> ReviewServiceResult<()> {
        let review = self.require_review(id).await?;
        access::owner_of_review(actor, &review)?;
        self.reviews.remove(id).await?;
        Ok(())
    }

    async fn require_task(&self, id: TaskId) -> ReviewServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(ReviewServiceError::TaskNotFound(id))
    }

    async fn require_review(&self, id: ReviewId) -> ReviewServiceResult<TaskReview> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or(ReviewServiceError::NotFound(id))
    }
}
