//! Catalogue repository over the in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Genre, GenreId, Rating, RatingId};

use super::{LockPoisoned, MemoryStore};

fn poisoned(err: LockPoisoned) -> CatalogueRepositoryError {
    CatalogueRepositoryError::query(err.to_string())
}

#[async_trait]
impl CatalogueRepository for MemoryStore {
    async fn list_ratings(&self) -> Result<Vec<Rating>, CatalogueRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state.ratings.values().cloned().collect())
    }

    async fn find_rating(&self, id: RatingId) -> Result<Option<Rating>, CatalogueRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state.ratings.get(&id).cloned())
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogueRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state.genres.values().cloned().collect())
    }

    async fn find_genre(&self, id: GenreId) -> Result<Option<Genre>, CatalogueRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state.genres.get(&id).cloned())
    }
}
