//! Port abstraction for the read-only rating and genre catalogues.

use async_trait::async_trait;

use crate::domain::{Genre, GenreId, Rating, RatingId, seed_genres, seed_ratings};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
        /// The backend cannot perform the operation.
        Unsupported { operation: String } => "catalogue storage does not support {operation}",
    }
}

/// Read access to the seeded catalogues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// All ratings in ascending identifier order.
    async fn list_ratings(&self) -> Result<Vec<Rating>, CatalogueRepositoryError>;

    /// Fetch one rating.
    async fn find_rating(&self, id: RatingId) -> Result<Option<Rating>, CatalogueRepositoryError>;

    /// All genres in ascending identifier order.
    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogueRepositoryError>;

    /// Fetch one genre.
    async fn find_genre(&self, id: GenreId) -> Result<Option<Genre>, CatalogueRepositoryError>;
}

/// Catalogue backed by the built-in seed lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueRepository;

#[async_trait]
impl CatalogueRepository for FixtureCatalogueRepository {
    async fn list_ratings(&self) -> Result<Vec<Rating>, CatalogueRepositoryError> {
        Ok(seed_ratings())
    }

    async fn find_rating(&self, id: RatingId) -> Result<Option<Rating>, CatalogueRepositoryError> {
        Ok(seed_ratings().into_iter().find(|rating| rating.id == id))
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogueRepositoryError> {
        Ok(seed_genres())
    }

    async fn find_genre(&self, id: GenreId) -> Result<Option<Genre>, CatalogueRepositoryError> {
        Ok(seed_genres().into_iter().find(|genre| genre.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_resolves_seeded_entries() {
        let repo = FixtureCatalogueRepository;
        let rating = repo
            .find_rating(RatingId::new(4))
            .await
            .expect("lookup succeeds")
            .expect("rating exists");
        assert_eq!(rating.name, "R");
        assert!(
            repo.find_genre(GenreId::new(99))
                .await
                .expect("lookup succeeds")
                .is_none()
        );
    }
}
