//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel ORM.
//!
//! Ratings and genres are seeded by migration and read-only at runtime.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Genre, GenreId, Rating, RatingId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{GenreRow, RatingRow};
use super::pool::{DbPool, PoolError};
use super::schema::{genres, ratings};

/// Diesel-backed implementation of the [`CatalogueRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) fn rating_from_row(row: RatingRow) -> Rating {
    Rating {
        id: RatingId::new(row.id),
        name: row.name,
    }
}

pub(super) fn genre_from_row(row: GenreRow) -> Genre {
    Genre {
        id: GenreId::new(row.id),
        name: row.name,
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: DieselError) -> CatalogueRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => CatalogueRepositoryError::connection(message),
        DieselFailure::NotFound => CatalogueRepositoryError::query("record not found"),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            CatalogueRepositoryError::query("constraint violation")
        }
        DieselFailure::Query(message) => CatalogueRepositoryError::query(message),
    }
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_ratings(&self) -> Result<Vec<Rating>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RatingRow> = ratings::table
            .select(RatingRow::as_select())
            .order_by(ratings::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(rating_from_row).collect())
    }

    async fn find_rating(&self, id: RatingId) -> Result<Option<Rating>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RatingRow> = ratings::table
            .find(id.get())
            .select(RatingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(rating_from_row))
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GenreRow> = genres::table
            .select(GenreRow::as_select())
            .order_by(genres::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(genre_from_row).collect())
    }

    async fn find_genre(&self, id: GenreId) -> Result<Option<Genre>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GenreRow> = genres::table
            .find(id.get())
            .select(GenreRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(genre_from_row))
    }
}
