//! Driving port for review reads.

use async_trait::async_trait;

use crate::domain::{Error, Review, ReviewId, ReviewListQuery};

/// Use-case port for reading reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Fetch one review.
    async fn get_review(&self, id: ReviewId) -> Result<Review, Error>;

    /// Reviews ordered most useful first.
    async fn list_reviews(&self, query: ReviewListQuery) -> Result<Vec<Review>, Error>;
}
