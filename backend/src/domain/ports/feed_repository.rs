//! Port abstraction for the append-only activity feed.

use async_trait::async_trait;

use crate::domain::{FeedEvent, NewFeedEvent, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feed repository adapters.
    pub enum FeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "feed repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "feed repository query failed: {message}",
        /// The backend cannot perform the operation.
        Unsupported { operation: String } => "feed storage does not support {operation}",
    }
}

/// Append-only event log keyed by acting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Append an event and return it with its allocated identifier.
    async fn append(&self, event: &NewFeedEvent) -> Result<FeedEvent, FeedRepositoryError>;

    /// A user's events ordered by timestamp, then identifier.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FeedEvent>, FeedRepositoryError>;
}
