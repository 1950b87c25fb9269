//! User repository over the in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserDraft, UserId};

use super::{LockPoisoned, MemoryStore};

fn poisoned(err: LockPoisoned) -> UserRepositoryError {
    UserRepositoryError::query(err.to_string())
}

fn stored_user(id: UserId, draft: &UserDraft) -> User {
    User {
        id,
        email: draft.email.clone(),
        login: draft.login.clone(),
        name: draft.effective_name().to_owned(),
        birthday: draft.birthday,
        friends: Default::default(),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, draft: &UserDraft) -> Result<User, UserRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if let Some(id) = draft.id.filter(|id| state.users.contains_key(id)) {
            return Err(UserRepositoryError::duplicate(id));
        }
        if state.email_owner(&draft.email).is_some() {
            return Err(UserRepositoryError::email_taken(draft.email.as_str()));
        }
        let id = match draft.id {
            Some(id) => {
                self.user_ids.observe(id);
                id
            }
            None => self.user_ids.allocate(),
        };
        let user = stored_user(id, draft);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<User, UserRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if !state.users.contains_key(&id) {
            return Err(UserRepositoryError::not_found(id));
        }
        if state
            .email_owner(&draft.email)
            .is_some_and(|owner| owner != id)
        {
            return Err(UserRepositoryError::email_taken(draft.email.as_str()));
        }
        let user = stored_user(id, draft);
        state.users.insert(id, user.clone());
        Ok(state.user_view(&user))
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        state
            .remove_user(id)
            .map(|_| ())
            .ok_or_else(|| UserRepositoryError::not_found(id))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state.users.get(&id).map(|user| state.user_view(user)))
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state
            .users
            .values()
            .map(|user| state.user_view(user))
            .collect())
    }

    async fn add_friend(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        for id in [user_id, friend_id] {
            if !state.users.contains_key(&id) {
                return Err(UserRepositoryError::not_found(id));
            }
        }
        state.friends.insert(user_id, friend_id);
        Ok(())
    }

    async fn remove_friend(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        for id in [user_id, friend_id] {
            if !state.users.contains_key(&id) {
                return Err(UserRepositoryError::not_found(id));
            }
        }
        state.friends.remove(&user_id, &friend_id);
        Ok(())
    }

    async fn friends_of(&self, user_id: UserId) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        if !state.users.contains_key(&user_id) {
            return Err(UserRepositoryError::not_found(user_id));
        }
        Ok(state
            .friends
            .members(&user_id)
            .iter()
            .filter_map(|friend_id| state.users.get(friend_id))
            .map(|friend| state.user_view(friend))
            .collect())
    }
}
