//! Application services for review threads.

mod commentary;

pub use commentary::{AddReviewRequest, ReviewService, ReviewServiceError, ReviewServiceResult};
