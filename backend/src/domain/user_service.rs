//! User domain service.
//!
//! Implements the user driving ports: validates drafts against the injected
//! clock, manages directed friendships and serves activity feeds.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::associations::intersect;
use crate::domain::ports::{FeedRepository, UserCommand, UserQuery, UserRepository};
use crate::domain::repository_errors::map_user_error;
use crate::domain::validation::{UserValidationError, validate_user};
use crate::domain::{
    Error, EventType, FeedEvent, FeedRecorder, Operation, User, UserDraft, UserId,
};

/// User service implementing [`UserCommand`] and [`UserQuery`].
pub struct UserService<U, E> {
    users: Arc<U>,
    feed: FeedRecorder<E>,
    clock: Arc<dyn Clock>,
}

impl<U, E> UserService<U, E> {
    /// Create a service over the given repositories.
    pub fn new(users: Arc<U>, feed: FeedRecorder<E>, clock: Arc<dyn Clock>) -> Self {
        Self { users, feed, clock }
    }
}

impl<U, E> UserService<U, E>
where
    U: UserRepository,
    E: FeedRepository,
{
    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    fn validate(&self, draft: UserDraft) -> Result<UserDraft, Error> {
        let today = self.clock.local().date_naive();
        validate_user(draft, today).map_err(|err| {
            debug!(field = err.field(), reason = %err, "user rejected");
            Error::from(err)
        })
    }

    async fn prepare_friendship(&self, user_id: UserId, friend_id: UserId) -> Result<(), Error> {
        if user_id == friend_id {
            return Err(UserValidationError::SelfFriendship.into());
        }
        self.require_user(user_id).await?;
        self.require_user(friend_id).await?;
        Ok(())
    }
}

#[async_trait]
impl<U, E> UserCommand for UserService<U, E>
where
    U: UserRepository,
    E: FeedRepository,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let draft = self.validate(draft)?;
        let user = self.users.create(&draft).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn update_user(&self, draft: UserDraft) -> Result<User, Error> {
        let Some(id) = draft.id else {
            return Err(Error::invalid_request("user id is required for update")
                .with_details(json!({ "field": "id" })));
        };
        let draft = self.validate(draft)?;
        let user = self
            .users
            .update(id, &draft)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        self.users.delete(id).await.map_err(map_user_error)?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), Error> {
        self.prepare_friendship(user_id, friend_id).await?;
        self.users
            .add_friend(user_id, friend_id)
            .await
            .map_err(map_user_error)?;
        self.feed
            .record(user_id, EventType::Friend, Operation::Add, friend_id.get())
            .await?;
        Ok(())
    }

    async fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), Error> {
        self.prepare_friendship(user_id, friend_id).await?;
        self.users
            .remove_friend(user_id, friend_id)
            .await
            .map_err(map_user_error)?;
        self.feed
            .record(user_id, EventType::Friend, Operation::Remove, friend_id.get())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<U, E> UserQuery for UserService<U, E>
where
    U: UserRepository,
    E: FeedRepository,
{
    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.require_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_error)
    }

    async fn friends(&self, user_id: UserId) -> Result<Vec<User>, Error> {
        self.require_user(user_id).await?;
        self.users.friends_of(user_id).await.map_err(map_user_error)
    }

    async fn common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>, Error> {
        let user = self.require_user(user_id).await?;
        let other = self.require_user(other_id).await?;
        let shared = intersect(&user.friends, &other.friends);
        let friends = self
            .users
            .friends_of(user_id)
            .await
            .map_err(map_user_error)?;
        Ok(friends
            .into_iter()
            .filter(|friend| shared.contains(&friend.id))
            .collect())
    }

    async fn feed(&self, user_id: UserId) -> Result<Vec<FeedEvent>, Error> {
        self.require_user(user_id).await?;
        self.feed.events_for(user_id).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
