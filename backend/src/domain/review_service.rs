//! Review domain service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    FeedRepository, FilmRepository, ReviewCommand, ReviewQuery, ReviewRepository, UserRepository,
};
use crate::domain::repository_errors::{map_film_error, map_review_error, map_user_error};
use crate::domain::validation::validate_review_content;
use crate::domain::{
    Error, EventType, FeedRecorder, FilmId, Operation, Review, ReviewDraft, ReviewId,
    ReviewListQuery, ReviewUpdate, ReviewVote, UserId,
};

/// Review service implementing [`ReviewCommand`] and [`ReviewQuery`].
///
/// Creating, editing and deleting a review appends a `REVIEW` event to the
/// author's feed. Votes do not.
pub struct ReviewService<R, F, U, E> {
    reviews: Arc<R>,
    films: Arc<F>,
    users: Arc<U>,
    feed: FeedRecorder<E>,
}

impl<R, F, U, E> ReviewService<R, F, U, E> {
    /// Create a service over the given repositories.
    pub fn new(reviews: Arc<R>, films: Arc<F>, users: Arc<U>, feed: FeedRecorder<E>) -> Self {
        Self {
            reviews,
            films,
            users,
            feed,
        }
    }
}

impl<R, F, U, E> ReviewService<R, F, U, E>
where
    R: ReviewRepository,
    F: FilmRepository,
    U: UserRepository,
    E: FeedRepository,
{
    async fn require_review(&self, id: ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| Error::not_found(format!("review {id} not found")))
    }

    async fn require_film(&self, id: FilmId) -> Result<(), Error> {
        match self.films.find_by_id(id).await.map_err(map_film_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("film {id} not found"))),
        }
    }

    async fn require_user(&self, id: UserId) -> Result<(), Error> {
        match self.users.find_by_id(id).await.map_err(map_user_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("user {id} not found"))),
        }
    }

    fn check_content(content: &str) -> Result<(), Error> {
        validate_review_content(content).map_err(|err| {
            debug!(reason = %err, "review rejected");
            Error::from(err)
        })
    }

    async fn prepare_vote(&self, review_id: ReviewId, user_id: UserId) -> Result<(), Error> {
        self.require_review(review_id).await?;
        self.require_user(user_id).await
    }
}

#[async_trait]
impl<R, F, U, E> ReviewCommand for ReviewService<R, F, U, E>
where
    R: ReviewRepository,
    F: FilmRepository,
    U: UserRepository,
    E: FeedRepository,
{
    async fn create_review(&self, draft: ReviewDraft) -> Result<Review, Error> {
        Self::check_content(&draft.content)?;
        self.require_film(draft.film_id).await?;
        self.require_user(draft.user_id).await?;
        let review = self
            .reviews
            .create(&draft)
            .await
            .map_err(map_review_error)?;
        self.feed
            .record(review.user_id, EventType::Review, Operation::Add, review.id.get())
            .await?;
        info!(review_id = %review.id, film_id = %review.film_id, "review created");
        Ok(review)
    }

    async fn update_review(&self, update: ReviewUpdate) -> Result<Review, Error> {
        Self::check_content(&update.content)?;
        let existing = self.require_review(update.id).await?;
        let review = self
            .reviews
            .update(&update)
            .await
            .map_err(map_review_error)?;
        self.feed
            .record(existing.user_id, EventType::Review, Operation::Update, update.id.get())
            .await?;
        info!(review_id = %update.id, "review updated");
        Ok(review)
    }

    async fn delete_review(&self, id: ReviewId) -> Result<(), Error> {
        let existing = self.require_review(id).await?;
        self.reviews.delete(id).await.map_err(map_review_error)?;
        self.feed
            .record(existing.user_id, EventType::Review, Operation::Remove, id.get())
            .await?;
        info!(review_id = %id, "review deleted");
        Ok(())
    }

    async fn add_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), Error> {
        self.prepare_vote(review_id, user_id).await?;
        self.reviews
            .cast_vote(review_id, user_id, vote)
            .await
            .map_err(map_review_error)
    }

    async fn remove_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), Error> {
        self.prepare_vote(review_id, user_id).await?;
        self.reviews
            .retract_vote(review_id, user_id, vote)
            .await
            .map_err(map_review_error)
    }
}

#[async_trait]
impl<R, F, U, E> ReviewQuery for ReviewService<R, F, U, E>
where
    R: ReviewRepository,
    F: FilmRepository,
    U: UserRepository,
    E: FeedRepository,
{
    async fn get_review(&self, id: ReviewId) -> Result<Review, Error> {
        self.require_review(id).await
    }

    async fn list_reviews(&self, query: ReviewListQuery) -> Result<Vec<Review>, Error> {
        self.reviews.list(query).await.map_err(map_review_error)
    }
}
