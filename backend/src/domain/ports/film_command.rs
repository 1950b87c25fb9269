//! Driving port for film mutations.

use async_trait::async_trait;

use crate::domain::{Error, Film, FilmDraft, FilmId, UserId};

/// Use-case port for creating, replacing and deleting films and for likes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmCommand: Send + Sync {
    /// Validate and store a new film.
    async fn create_film(&self, draft: FilmDraft) -> Result<Film, Error>;

    /// Validate and replace an existing film. The draft must carry an id.
    async fn update_film(&self, draft: FilmDraft) -> Result<Film, Error>;

    /// Delete a film.
    async fn delete_film(&self, id: FilmId) -> Result<(), Error>;

    /// Like a film on behalf of a user and record a feed event.
    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), Error>;

    /// Withdraw a like and record a feed event.
    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), Error>;
}
