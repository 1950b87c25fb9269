//! Film domain service.
//!
//! Implements the film driving ports: validates drafts, resolves catalogue
//! references, delegates storage to the film repository and records like
//! events in the feed. Rankings and intersections are derived in
//! [`crate::domain::associations`] from repository snapshots.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::associations;
use crate::domain::ports::{
    CatalogueRepository, FeedRepository, FilmCommand, FilmQuery, FilmRepository, UserRepository,
};
use crate::domain::repository_errors::{map_catalogue_error, map_film_error, map_user_error};
use crate::domain::validation::validate_film;
use crate::domain::{
    Error, EventType, FeedRecorder, Film, FilmDraft, FilmId, FilmSearch, Operation,
    PopularFilmsQuery, SearchField, User, UserId,
};

/// Film service implementing [`FilmCommand`] and [`FilmQuery`].
pub struct FilmService<F, U, C, E> {
    films: Arc<F>,
    users: Arc<U>,
    catalogue: Arc<C>,
    feed: FeedRecorder<E>,
}

impl<F, U, C, E> FilmService<F, U, C, E> {
    /// Create a service over the given repositories.
    pub fn new(films: Arc<F>, users: Arc<U>, catalogue: Arc<C>, feed: FeedRecorder<E>) -> Self {
        Self {
            films,
            users,
            catalogue,
            feed,
        }
    }
}

impl<F, U, C, E> FilmService<F, U, C, E>
where
    F: FilmRepository,
    U: UserRepository,
    C: CatalogueRepository,
    E: FeedRepository,
{
    async fn require_film(&self, id: FilmId) -> Result<Film, Error> {
        self.films
            .find_by_id(id)
            .await
            .map_err(map_film_error)?
            .ok_or_else(|| Error::not_found(format!("film {id} not found")))
    }

    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn check_catalogue_references(&self, draft: &FilmDraft) -> Result<(), Error> {
        if let Some(rating_id) = draft.mpa {
            let rating = self
                .catalogue
                .find_rating(rating_id)
                .await
                .map_err(map_catalogue_error)?;
            if rating.is_none() {
                return Err(Error::not_found(format!("rating {rating_id} not found")));
            }
        }
        for genre_id in &draft.genres {
            let genre = self
                .catalogue
                .find_genre(*genre_id)
                .await
                .map_err(map_catalogue_error)?;
            if genre.is_none() {
                return Err(Error::not_found(format!("genre {genre_id} not found")));
            }
        }
        Ok(())
    }

    async fn prepare(&self, mut draft: FilmDraft) -> Result<FilmDraft, Error> {
        if let Err(err) = validate_film(&draft) {
            debug!(field = err.field(), reason = %err, "film rejected");
            return Err(err.into());
        }
        draft.normalise_genres();
        self.check_catalogue_references(&draft).await?;
        Ok(draft)
    }

    async fn all_films(&self) -> Result<Vec<Film>, Error> {
        self.films.list().await.map_err(map_film_error)
    }
}

#[async_trait]
impl<F, U, C, E> FilmCommand for FilmService<F, U, C, E>
where
    F: FilmRepository,
    U: UserRepository,
    C: CatalogueRepository,
    E: FeedRepository,
{
    async fn create_film(&self, draft: FilmDraft) -> Result<Film, Error> {
        let draft = self.prepare(draft).await?;
        let film = self.films.create(&draft).await.map_err(map_film_error)?;
        info!(film_id = %film.id, "film created");
        Ok(film)
    }

    async fn update_film(&self, draft: FilmDraft) -> Result<Film, Error> {
        let Some(id) = draft.id else {
            return Err(Error::invalid_request("film id is required for update")
                .with_details(json!({ "field": "id" })));
        };
        let draft = self.prepare(draft).await?;
        let film = self
            .films
            .update(id, &draft)
            .await
            .map_err(map_film_error)?;
        info!(film_id = %id, "film updated");
        Ok(film)
    }

    async fn delete_film(&self, id: FilmId) -> Result<(), Error> {
        self.films.delete(id).await.map_err(map_film_error)?;
        info!(film_id = %id, "film deleted");
        Ok(())
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), Error> {
        self.require_film(film_id).await?;
        self.require_user(user_id).await?;
        self.films
            .add_like(film_id, user_id)
            .await
            .map_err(map_film_error)?;
        self.feed
            .record(user_id, EventType::Like, Operation::Add, film_id.get())
            .await?;
        Ok(())
    }

    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), Error> {
        self.require_film(film_id).await?;
        self.require_user(user_id).await?;
        self.films
            .remove_like(film_id, user_id)
            .await
            .map_err(map_film_error)?;
        self.feed
            .record(user_id, EventType::Like, Operation::Remove, film_id.get())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<F, U, C, E> FilmQuery for FilmService<F, U, C, E>
where
    F: FilmRepository,
    U: UserRepository,
    C: CatalogueRepository,
    E: FeedRepository,
{
    async fn get_film(&self, id: FilmId) -> Result<Film, Error> {
        self.require_film(id).await
    }

    async fn list_films(&self) -> Result<Vec<Film>, Error> {
        self.all_films().await
    }

    async fn most_popular(&self, query: PopularFilmsQuery) -> Result<Vec<Film>, Error> {
        let films = self.all_films().await?;
        Ok(associations::most_popular(films, &query))
    }

    async fn common_films(&self, user_id: UserId, friend_id: UserId) -> Result<Vec<Film>, Error> {
        self.require_user(user_id).await?;
        self.require_user(friend_id).await?;
        let films = self.all_films().await?;
        Ok(associations::common_films(films, user_id, friend_id))
    }

    async fn search_films(&self, search: FilmSearch) -> Result<Vec<Film>, Error> {
        if search.by.contains(&SearchField::Director) {
            return Err(Error::unsupported("searching films by director is not supported"));
        }
        let films = self.all_films().await?;
        Ok(associations::search_by_title(films, &search.query))
    }

    async fn recommendations(&self, user_id: UserId) -> Result<Vec<Film>, Error> {
        self.require_user(user_id).await?;
        let films = self.all_films().await?;
        Ok(associations::recommend(films, user_id))
    }
}

#[cfg(test)]
#[path = "film_service_tests.rs"]
mod tests;
