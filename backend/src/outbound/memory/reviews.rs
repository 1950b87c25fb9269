//! Review repository over the in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{
    Review, ReviewDraft, ReviewId, ReviewListQuery, ReviewUpdate, ReviewVote, UserId,
    sort_by_usefulness,
};

use super::{LockPoisoned, MemoryStore};

fn poisoned(err: LockPoisoned) -> ReviewRepositoryError {
    ReviewRepositoryError::query(err.to_string())
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn create(&self, draft: &ReviewDraft) -> Result<Review, ReviewRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if let Some(id) = draft.id.filter(|id| state.reviews.contains_key(id)) {
            return Err(ReviewRepositoryError::duplicate(id));
        }
        if !state.films.contains_key(&draft.film_id) {
            return Err(ReviewRepositoryError::unknown_reference(format!(
                "film {} not found",
                draft.film_id
            )));
        }
        if !state.users.contains_key(&draft.user_id) {
            return Err(ReviewRepositoryError::unknown_reference(format!(
                "user {} not found",
                draft.user_id
            )));
        }
        let id = match draft.id {
            Some(id) => {
                self.review_ids.observe(id);
                id
            }
            None => self.review_ids.allocate(),
        };
        let review = Review {
            id,
            film_id: draft.film_id,
            user_id: draft.user_id,
            content: draft.content.clone(),
            is_positive: draft.is_positive,
            useful: 0,
        };
        state.reviews.insert(id, review.clone());
        Ok(review)
    }

    async fn update(&self, update: &ReviewUpdate) -> Result<Review, ReviewRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        let review = state
            .reviews
            .get_mut(&update.id)
            .ok_or_else(|| ReviewRepositoryError::not_found(update.id))?;
        review.content = update.content.clone();
        review.is_positive = update.is_positive;
        let updated = review.clone();
        Ok(state.review_view(&updated))
    }

    async fn delete(&self, id: ReviewId) -> Result<(), ReviewRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        state
            .remove_review(id)
            .map(|_| ())
            .ok_or_else(|| ReviewRepositoryError::not_found(id))
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state.reviews.get(&id).map(|review| state.review_view(review)))
    }

    async fn list(&self, query: ReviewListQuery) -> Result<Vec<Review>, ReviewRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .filter(|review| query.film_id.is_none_or(|film_id| review.film_id == film_id))
            .map(|review| state.review_view(review))
            .collect();
        sort_by_usefulness(&mut reviews);
        reviews.truncate(query.count);
        Ok(reviews)
    }

    async fn cast_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), ReviewRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if !state.reviews.contains_key(&review_id) {
            return Err(ReviewRepositoryError::not_found(review_id));
        }
        if !state.users.contains_key(&user_id) {
            return Err(ReviewRepositoryError::unknown_reference(format!(
                "user {user_id} not found"
            )));
        }
        state
            .votes
            .entry(review_id)
            .or_default()
            .insert(user_id, vote);
        Ok(())
    }

    async fn retract_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), ReviewRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if !state.reviews.contains_key(&review_id) {
            return Err(ReviewRepositoryError::not_found(review_id));
        }
        if let Some(votes) = state.votes.get_mut(&review_id) {
            if votes.get(&user_id) == Some(&vote) {
                votes.remove(&user_id);
            }
        }
        Ok(())
    }
}
