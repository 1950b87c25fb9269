//! Driving port for film reads and derived film views.

use async_trait::async_trait;

use crate::domain::{Error, Film, FilmId, FilmSearch, PopularFilmsQuery, UserId};

/// Use-case port for reading films and the rankings built from likes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmQuery: Send + Sync {
    /// Fetch one film.
    async fn get_film(&self, id: FilmId) -> Result<Film, Error>;

    /// All films in ascending identifier order.
    async fn list_films(&self) -> Result<Vec<Film>, Error>;

    /// Films ranked by like count.
    async fn most_popular(&self, query: PopularFilmsQuery) -> Result<Vec<Film>, Error>;

    /// Films liked by both users, most popular first.
    async fn common_films(&self, user_id: UserId, friend_id: UserId) -> Result<Vec<Film>, Error>;

    /// Films whose title contains the query, most popular first.
    async fn search_films(&self, search: FilmSearch) -> Result<Vec<Film>, Error>;

    /// Films liked by the user with the most similar taste.
    async fn recommendations(&self, user_id: UserId) -> Result<Vec<Film>, Error>;
}
