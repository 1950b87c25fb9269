//! Feed repository over the in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{FeedRepository, FeedRepositoryError};
use crate::domain::{FeedEvent, NewFeedEvent, UserId, sort_chronologically};

use super::{LockPoisoned, MemoryStore};

fn poisoned(err: LockPoisoned) -> FeedRepositoryError {
    FeedRepositoryError::query(err.to_string())
}

#[async_trait]
impl FeedRepository for MemoryStore {
    async fn append(&self, event: &NewFeedEvent) -> Result<FeedEvent, FeedRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        let stored = FeedEvent::from_new(self.event_ids.allocate(), event.clone());
        state.events.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FeedEvent>, FeedRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        let mut events: Vec<FeedEvent> = state
            .events
            .iter()
            .filter(|event| event.user_id == user_id)
            .cloned()
            .collect();
        sort_chronologically(&mut events);
        Ok(events)
    }
}
