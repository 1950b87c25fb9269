//! Driving port for review mutations.

use async_trait::async_trait;

use crate::domain::{Error, Review, ReviewDraft, ReviewId, ReviewUpdate, ReviewVote, UserId};

/// Use-case port for writing reviews and voting on them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Post a review of an existing film by an existing user.
    async fn create_review(&self, draft: ReviewDraft) -> Result<Review, Error>;

    /// Replace a review's content and polarity.
    async fn update_review(&self, update: ReviewUpdate) -> Result<Review, Error>;

    /// Delete a review.
    async fn delete_review(&self, id: ReviewId) -> Result<(), Error>;

    /// Cast or replace a user's vote on a review.
    async fn add_vote(&self, review_id: ReviewId, user_id: UserId, vote: ReviewVote)
    -> Result<(), Error>;

    /// Withdraw a user's vote of the given kind.
    async fn remove_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), Error>;
}
