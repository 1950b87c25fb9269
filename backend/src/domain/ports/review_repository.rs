//! Port abstraction for review storage adapters.

use async_trait::async_trait;

use crate::domain::{Review, ReviewDraft, ReviewId, ReviewListQuery, ReviewUpdate, ReviewVote, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// No review is stored under the identifier.
        NotFound { id: i64 } => "review {id} not found",
        /// A review is already stored under the explicit identifier.
        Duplicate { id: i64 } => "review {id} already exists",
        /// The film, author or voter does not exist.
        UnknownReference { message: String } => "{message}",
        /// The backend cannot perform the operation.
        Unsupported { operation: String } => "review storage does not support {operation}",
    }
}

/// Keyed storage for reviews and their votes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Store a new review with a zero usefulness score.
    async fn create(&self, draft: &ReviewDraft) -> Result<Review, ReviewRepositoryError>;

    /// Replace the content and polarity of a review.
    async fn update(&self, update: &ReviewUpdate) -> Result<Review, ReviewRepositoryError>;

    /// Remove a review and its votes.
    async fn delete(&self, id: ReviewId) -> Result<(), ReviewRepositoryError>;

    /// Fetch a review by identifier.
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Reviews ordered most useful first, optionally for one film.
    async fn list(&self, query: ReviewListQuery) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Set the user's vote on a review, replacing any earlier vote.
    async fn cast_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), ReviewRepositoryError>;

    /// Clear the user's vote if it matches `vote`. Idempotent.
    async fn retract_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), ReviewRepositoryError>;
}
