//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId};

/// Use-case port for registering users and managing friendships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Validate and register a user.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Validate and replace an existing user. The draft must carry an id.
    async fn update_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Delete a user.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;

    /// Add a directed friendship and record a feed event.
    async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), Error>;

    /// Remove a directed friendship and record a feed event.
    async fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), Error>;
}
