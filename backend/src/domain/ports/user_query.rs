//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::{Error, FeedEvent, User, UserId};

/// Use-case port for reading users, friend lists and activity feeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Fetch one user.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;

    /// All users in ascending identifier order.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// The users `user_id` has befriended.
    async fn friends(&self, user_id: UserId) -> Result<Vec<User>, Error>;

    /// Users befriended by both `user_id` and `other_id`.
    async fn common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>, Error>;

    /// The user's own activity, oldest first.
    async fn feed(&self, user_id: UserId) -> Result<Vec<FeedEvent>, Error>;
}
