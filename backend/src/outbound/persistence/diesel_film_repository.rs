//! PostgreSQL-backed `FilmRepository` implementation using Diesel ORM.
//!
//! A film spans three tables: `films`, `film_genres` and `film_likes`. Writes
//! touching more than one of them run in a transaction, and reads assemble
//! the domain [`Film`] from all three plus the rating catalogue.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{FilmRepository, FilmRepositoryError};
use crate::domain::{Film, FilmDraft, FilmId, Genre, Rating, UserId};

use super::diesel_catalogue_repository::{genre_from_row, rating_from_row};
use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{
    FilmGenreRow, FilmLikeRow, FilmRow, FilmUpdate, GenreRow, NewFilmRow, RatingRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{film_genres, film_likes, films, genres, ratings};

/// Realigns the BIGSERIAL after a caller-chosen id.
const SYNC_FILM_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('films', 'id'), \
     (SELECT COALESCE(MAX(id), 1) FROM films))";

/// Diesel-backed implementation of the [`FilmRepository`] port.
#[derive(Clone)]
pub struct DieselFilmRepository {
    pool: DbPool,
}

impl DieselFilmRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use backend::outbound::persistence::{DbPool, DieselFilmRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/cinegraph")).await?;
    /// let repository = DieselFilmRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FilmRepositoryError {
    FilmRepositoryError::connection(error.into_message())
}

/// Map a Diesel failure for an operation on `film`.
fn map_diesel_error(error: DieselError, film: Option<FilmId>) -> FilmRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.is_unique_on("films_pkey") {
        return film.map_or_else(
            || FilmRepositoryError::query("duplicate film id"),
            FilmRepositoryError::duplicate,
        );
    }
    if failure.is_foreign_key_on("rating_id") {
        return FilmRepositoryError::unknown_reference("rating not found");
    }
    if failure.is_foreign_key_on("genre_id") {
        return FilmRepositoryError::unknown_reference("genre not found");
    }
    match failure {
        DieselFailure::Connection(message) => FilmRepositoryError::connection(message),
        DieselFailure::NotFound => film.map_or_else(
            || FilmRepositoryError::query("record not found"),
            FilmRepositoryError::not_found,
        ),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            FilmRepositoryError::query("constraint violation")
        }
        DieselFailure::Query(message) => FilmRepositoryError::query(message),
    }
}

/// Likes reference a user as well as a film.
fn map_like_error(error: DieselError, film: FilmId, user: UserId) -> FilmRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.is_foreign_key_on("user_id") {
        return FilmRepositoryError::unknown_reference(format!("user {user} not found"));
    }
    if failure.is_foreign_key_on("film_id") {
        return FilmRepositoryError::not_found(film);
    }
    match failure {
        DieselFailure::Connection(message) => FilmRepositoryError::connection(message),
        DieselFailure::NotFound => FilmRepositoryError::not_found(film),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            FilmRepositoryError::query("constraint violation")
        }
        DieselFailure::Query(message) => FilmRepositoryError::query(message),
    }
}

fn genre_rows(film_id: i64, draft: &FilmDraft) -> Vec<FilmGenreRow> {
    let unique: BTreeSet<i64> = draft.genres.iter().map(|genre| genre.get()).collect();
    unique
        .into_iter()
        .map(|genre_id| FilmGenreRow { film_id, genre_id })
        .collect()
}

/// Load genres, likes and ratings for `rows` and build domain films.
async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<FilmRow>,
) -> Result<Vec<Film>, DieselError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let ratings_by_id: BTreeMap<i64, Rating> = ratings::table
        .select(RatingRow::as_select())
        .load(conn)
        .await?
        .into_iter()
        .map(|row| (row.id, rating_from_row(row)))
        .collect();

    let genre_pairs: Vec<(i64, GenreRow)> = film_genres::table
        .inner_join(genres::table)
        .filter(film_genres::film_id.eq_any(&ids))
        .select((film_genres::film_id, GenreRow::as_select()))
        .order_by((film_genres::film_id, genres::id))
        .load(conn)
        .await?;
    let mut genres_by_film: BTreeMap<i64, Vec<Genre>> = BTreeMap::new();
    for (film_id, row) in genre_pairs {
        genres_by_film
            .entry(film_id)
            .or_default()
            .push(genre_from_row(row));
    }

    let like_rows: Vec<FilmLikeRow> = film_likes::table
        .filter(film_likes::film_id.eq_any(&ids))
        .select(FilmLikeRow::as_select())
        .load(conn)
        .await?;
    let mut likes_by_film: BTreeMap<i64, BTreeSet<UserId>> = BTreeMap::new();
    for like in like_rows {
        likes_by_film
            .entry(like.film_id)
            .or_default()
            .insert(UserId::new(like.user_id));
    }

    Ok(rows
        .into_iter()
        .map(|row| Film {
            id: FilmId::new(row.id),
            mpa: row.rating_id.and_then(|id| ratings_by_id.get(&id).cloned()),
            genres: genres_by_film.remove(&row.id).unwrap_or_default(),
            likes: likes_by_film.remove(&row.id).unwrap_or_default(),
            name: row.name,
            description: row.description,
            release_date: row.release_date,
            duration: row.duration,
        })
        .collect())
}

async fn load_film(conn: &mut AsyncPgConnection, id: i64) -> Result<Option<Film>, DieselError> {
    let row: Option<FilmRow> = films::table
        .find(id)
        .select(FilmRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![row]).await?.into_iter().next())
}

async fn film_exists(conn: &mut AsyncPgConnection, id: i64) -> Result<bool, DieselError> {
    let found: Option<i64> = films::table
        .find(id)
        .select(films::id)
        .first(conn)
        .await
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl FilmRepository for DieselFilmRepository {
    async fn create(&self, draft: &FilmDraft) -> Result<Film, FilmRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let new_row = NewFilmRow {
                    id: draft.id.map(FilmId::get),
                    name: &draft.name,
                    description: &draft.description,
                    release_date: draft.release_date,
                    duration: draft.duration,
                    rating_id: draft.mpa.map(|rating| rating.get()),
                };
                let id: i64 = diesel::insert_into(films::table)
                    .values(&new_row)
                    .returning(films::id)
                    .get_result(conn)
                    .await?;
                if draft.id.is_some() {
                    diesel::sql_query(SYNC_FILM_SEQUENCE).execute(conn).await?;
                }

                let genres = genre_rows(id, draft);
                if !genres.is_empty() {
                    diesel::insert_into(film_genres::table)
                        .values(&genres)
                        .execute(conn)
                        .await?;
                }

                load_film(conn, id).await?.ok_or(DieselError::NotFound)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, draft.id))
    }

    async fn update(&self, id: FilmId, draft: &FilmDraft) -> Result<Film, FilmRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let changes = FilmUpdate {
                    name: &draft.name,
                    description: &draft.description,
                    release_date: draft.release_date,
                    duration: draft.duration,
                    rating_id: draft.mpa.map(|rating| rating.get()),
                };
                let updated = diesel::update(films::table.find(id.get()))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(DieselError::NotFound);
                }

                diesel::delete(film_genres::table.filter(film_genres::film_id.eq(id.get())))
                    .execute(conn)
                    .await?;
                let genres = genre_rows(id.get(), draft);
                if !genres.is_empty() {
                    diesel::insert_into(film_genres::table)
                        .values(&genres)
                        .execute(conn)
                        .await?;
                }

                load_film(conn, id.get()).await?.ok_or(DieselError::NotFound)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, Some(id)))
    }

    async fn delete(&self, id: FilmId) -> Result<(), FilmRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Genres, likes and reviews cascade.
        let deleted = diesel::delete(films::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(id)))?;
        if deleted == 0 {
            return Err(FilmRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: FilmId) -> Result<Option<Film>, FilmRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        load_film(&mut pooled, id.get())
            .await
            .map_err(|err| map_diesel_error(err, None))
    }

    async fn list(&self) -> Result<Vec<Film>, FilmRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let rows: Vec<FilmRow> = films::table
                    .select(FilmRow::as_select())
                    .order_by(films::id)
                    .load(conn)
                    .await?;
                assemble(conn, rows).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, None))
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), FilmRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        if !film_exists(conn, film_id.get())
            .await
            .map_err(|err| map_like_error(err, film_id, user_id))?
        {
            return Err(FilmRepositoryError::not_found(film_id));
        }
        diesel::insert_into(film_likes::table)
            .values(&FilmLikeRow {
                film_id: film_id.get(),
                user_id: user_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(conn)
            .await
            .map(|_| ())
            .map_err(|err| map_like_error(err, film_id, user_id))
    }

    async fn remove_like(
        &self,
        film_id: FilmId,
        user_id: UserId,
    ) -> Result<(), FilmRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        if !film_exists(conn, film_id.get())
            .await
            .map_err(|err| map_like_error(err, film_id, user_id))?
        {
            return Err(FilmRepositoryError::not_found(film_id));
        }
        diesel::delete(
            film_likes::table
                .filter(film_likes::film_id.eq(film_id.get()))
                .filter(film_likes::user_id.eq(user_id.get())),
        )
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(|err| map_like_error(err, film_id, user_id))
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; query behaviour is exercised against a live
    //! database outside unit tests.
    use super::*;
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(String::from("simulated failure")))
    }

    #[rstest]
    fn missing_row_maps_to_not_found_for_known_film() {
        let error = map_diesel_error(DieselError::NotFound, Some(FilmId::new(4)));
        assert_eq!(error, FilmRepositoryError::not_found(4_i64));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let error = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection), None);
        assert!(matches!(error, FilmRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn anonymous_constraint_failures_are_query_errors() {
        let error = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation), None);
        assert_eq!(error, FilmRepositoryError::query("constraint violation"));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, FilmRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn genre_rows_are_deduplicated() {
        let draft = FilmDraft {
            id: None,
            name: "Heat".into(),
            description: String::new(),
            release_date: chrono::NaiveDate::from_ymd_opt(1995, 12, 15).expect("date"),
            duration: 170,
            mpa: None,
            genres: vec![
                crate::domain::GenreId::new(4),
                crate::domain::GenreId::new(6),
                crate::domain::GenreId::new(4),
            ],
        };
        let rows: Vec<i64> = genre_rows(9, &draft)
            .iter()
            .map(|row| row.genre_id)
            .collect();
        assert_eq!(rows, vec![4, 6]);
    }
}
