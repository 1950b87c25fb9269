//! Driving port for the rating and genre catalogues.

use async_trait::async_trait;

use crate::domain::{Error, Genre, GenreId, Rating, RatingId};

/// Use-case port for catalogue lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// All ratings.
    async fn list_ratings(&self) -> Result<Vec<Rating>, Error>;

    /// One rating, or not found.
    async fn get_rating(&self, id: RatingId) -> Result<Rating, Error>;

    /// All genres.
    async fn list_genres(&self) -> Result<Vec<Genre>, Error>;

    /// One genre, or not found.
    async fn get_genre(&self, id: GenreId) -> Result<Genre, Error>;
}
