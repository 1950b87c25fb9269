//! Catalogue lookups for ratings and genres.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository};
use crate::domain::repository_errors::map_catalogue_error;
use crate::domain::{Error, Genre, GenreId, Rating, RatingId};

/// Catalogue service implementing [`CatalogueQuery`].
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    /// Create a service over the catalogue repository.
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl<C: CatalogueRepository> CatalogueQuery for CatalogueService<C> {
    async fn list_ratings(&self) -> Result<Vec<Rating>, Error> {
        self.catalogue
            .list_ratings()
            .await
            .map_err(map_catalogue_error)
    }

    async fn get_rating(&self, id: RatingId) -> Result<Rating, Error> {
        self.catalogue
            .find_rating(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("rating {id} not found")))
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, Error> {
        self.catalogue
            .list_genres()
            .await
            .map_err(map_catalogue_error)
    }

    async fn get_genre(&self, id: GenreId) -> Result<Genre, Error> {
        self.catalogue
            .find_genre(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("genre {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        CatalogueRepositoryError, FixtureCatalogueRepository, MockCatalogueRepository,
    };
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn lists_seeded_genres() {
        let service = CatalogueService::new(Arc::new(FixtureCatalogueRepository));
        let genres = service.list_genres().await.expect("genres");
        assert_eq!(genres.len(), 6);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[tokio::test]
    async fn unknown_rating_is_not_found(#[case] id: i64) {
        let service = CatalogueService::new(Arc::new(FixtureCatalogueRepository));
        let err = service
            .get_rating(RatingId::new(id))
            .await
            .expect_err("unknown rating");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_failures_surface_as_internal() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_find_genre()
            .returning(|_| Err(CatalogueRepositoryError::query("relation missing")));
        let service = CatalogueService::new(Arc::new(repo));

        let err = service
            .get_genre(GenreId::new(1))
            .await
            .expect_err("query failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
