//! Task review aggregate and validated content.

use super::ReviewDomainError;
use crate::identity::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a review record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Creates a new random review identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a review identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated, non-empty review text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewContent(String);

impl ReviewContent {
    /// Creates validated review content.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyContent`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ReviewDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ReviewDomainError::EmptyContent);
        }
        Ok(Self(normalized))
    }

    /// Returns the content as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ReviewContent {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ReviewContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameter object for reconstructing a persisted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReviewData {
    /// Persisted review identifier.
    pub id: ReviewId,
    /// Persisted parent task.
    pub task: TaskId,
    /// Persisted author.
    pub author: UserId,
    /// Persisted content.
    pub content: ReviewContent,
    /// Persisted reply target, if any.
    pub reply: Option<ReviewId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Review comment attached to a task.
///
/// `reply` gives single-level threading: a review may point at an earlier
/// review of the same task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReview {
    id: ReviewId,
    task: TaskId,
    author: UserId,
    content: ReviewContent,
    reply: Option<ReviewId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskReview {
    /// Creates a new review.
    #[must_use]
    pub fn new(
        task: TaskId,
        author: UserId,
        content: ReviewContent,
        reply: Option<ReviewId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ReviewId::new(),
            task,
            author,
            content,
            reply,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a review from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReviewData) -> Self {
        Self {
            id: data.id,
            task: data.task,
            author: data.author,
            content: data.content,
            reply: data.reply,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the parent task identifier.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the review content.
    #[must_use]
    pub const fn content(&self) -> &ReviewContent {
        &self.content
    }

    /// Returns the reply target, if any.
    #[must_use]
    pub const fn reply(&self) -> Option<ReviewId> {
        self.reply
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the content wholesale.
    pub fn replace_content(&mut self, content: ReviewContent, clock: &impl Clock) {
        self.content = content;
        self.updated_at = clock.utc();
    }
}
