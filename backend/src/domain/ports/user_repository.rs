//! Port abstraction for user storage adapters.
//!
//! Friendship is stored as a directed association owned by the user store.
//! Deleting a user removes their friendships in both directions together
//! with their likes, reviews and review votes.

use async_trait::async_trait;

use crate::domain::{User, UserDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// No user is stored under the identifier.
        NotFound { id: i64 } => "user {id} not found",
        /// A user is already stored under the explicit identifier.
        Duplicate { id: i64 } => "user {id} already exists",
        /// Another user already registered the email address.
        EmailTaken { email: String } => "email {email} is already registered",
        /// The backend cannot perform the operation.
        Unsupported { operation: String } => "user storage does not support {operation}",
    }
}

/// Keyed storage for users and their friendships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Email uniqueness is checked atomically with the
    /// insert.
    async fn create(&self, draft: &UserDraft) -> Result<User, UserRepositoryError>;

    /// Replace every stored field except the friend set.
    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<User, UserRepositoryError>;

    /// Remove a user and every association that references them.
    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// All users in ascending identifier order.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Add `friend_id` to the friends of `user_id`. Idempotent.
    async fn add_friend(&self, user_id: UserId, friend_id: UserId)
    -> Result<(), UserRepositoryError>;

    /// Drop `friend_id` from the friends of `user_id`. Idempotent.
    async fn remove_friend(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<(), UserRepositoryError>;

    /// The users `user_id` has befriended, ascending by identifier.
    async fn friends_of(&self, user_id: UserId) -> Result<Vec<User>, UserRepositoryError>;
}
