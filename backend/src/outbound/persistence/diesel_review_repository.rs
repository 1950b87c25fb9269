//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! Usefulness is never stored: it is recomputed from `review_votes` on every
//! read, so a vote and the score it implies cannot drift apart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{
    FilmId, Review, ReviewDraft, ReviewId, ReviewListQuery, ReviewUpdate, ReviewVote, UserId,
    sort_by_usefulness, useful_score,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewReviewRow, ReviewRow, ReviewVoteRow};
use super::pool::{DbPool, PoolError};
use super::schema::{review_votes, reviews};

const SYNC_REVIEW_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('reviews', 'id'), \
     (SELECT COALESCE(MAX(id), 1) FROM reviews))";

/// Diesel-backed implementation of the [`ReviewRepository`] port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    ReviewRepositoryError::connection(error.into_message())
}

/// Context for naming the missing side of a failed write.
#[derive(Debug, Clone, Copy, Default)]
struct ReviewContext {
    review: Option<ReviewId>,
    film: Option<FilmId>,
    user: Option<UserId>,
}

fn map_diesel_error(error: DieselError, context: ReviewContext) -> ReviewRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.is_unique_on("reviews_pkey") {
        if let Some(review) = context.review {
            return ReviewRepositoryError::duplicate(review);
        }
    }
    if failure.is_foreign_key_on("film_id") {
        let film = context.film.map_or_else(String::new, |id| format!(" {id}"));
        return ReviewRepositoryError::unknown_reference(format!("film{film} not found"));
    }
    if failure.is_foreign_key_on("user_id") {
        let user = context.user.map_or_else(String::new, |id| format!(" {id}"));
        return ReviewRepositoryError::unknown_reference(format!("user{user} not found"));
    }
    if failure.is_foreign_key_on("review_id") {
        if let Some(review) = context.review {
            return ReviewRepositoryError::not_found(review);
        }
    }
    match failure {
        DieselFailure::Connection(message) => ReviewRepositoryError::connection(message),
        DieselFailure::NotFound => context.review.map_or_else(
            || ReviewRepositoryError::query("record not found"),
            ReviewRepositoryError::not_found,
        ),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            ReviewRepositoryError::query("constraint violation")
        }
        DieselFailure::Query(message) => ReviewRepositoryError::query(message),
    }
}

fn review_from_row(row: ReviewRow, useful: i64) -> Review {
    Review {
        id: ReviewId::new(row.id),
        film_id: FilmId::new(row.film_id),
        user_id: UserId::new(row.user_id),
        content: row.content,
        is_positive: row.is_positive,
        useful,
    }
}

/// Attach usefulness scores to `rows`.
async fn score(
    conn: &mut AsyncPgConnection,
    rows: Vec<ReviewRow>,
) -> Result<Vec<Review>, DieselError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let votes: Vec<ReviewVoteRow> = review_votes::table
        .filter(review_votes::review_id.eq_any(&ids))
        .select(ReviewVoteRow::as_select())
        .load(conn)
        .await?;
    let mut votes_by_review: BTreeMap<i64, Vec<ReviewVote>> = BTreeMap::new();
    for vote in votes {
        votes_by_review
            .entry(vote.review_id)
            .or_default()
            .push(ReviewVote::from_useful(vote.is_useful));
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let useful = useful_score(votes_by_review.remove(&row.id).unwrap_or_default());
            review_from_row(row, useful)
        })
        .collect())
}

async fn load_review(conn: &mut AsyncPgConnection, id: i64) -> Result<Option<Review>, DieselError> {
    let row: Option<ReviewRow> = reviews::table
        .find(id)
        .select(ReviewRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(score(conn, vec![row]).await?.into_iter().next())
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn create(&self, draft: &ReviewDraft) -> Result<Review, ReviewRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let context = ReviewContext {
            review: draft.id,
            film: Some(draft.film_id),
            user: Some(draft.user_id),
        };

        let row: ReviewRow = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let new_row = NewReviewRow {
                        id: draft.id.map(ReviewId::get),
                        film_id: draft.film_id.get(),
                        user_id: draft.user_id.get(),
                        content: &draft.content,
                        is_positive: draft.is_positive,
                    };
                    let row: ReviewRow = diesel::insert_into(reviews::table)
                        .values(&new_row)
                        .returning(ReviewRow::as_returning())
                        .get_result(conn)
                        .await?;
                    if draft.id.is_some() {
                        diesel::sql_query(SYNC_REVIEW_SEQUENCE).execute(conn).await?;
                    }
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, context))?;

        Ok(review_from_row(row, 0))
    }

    async fn update(&self, update: &ReviewUpdate) -> Result<Review, ReviewRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let context = ReviewContext {
            review: Some(update.id),
            ..ReviewContext::default()
        };

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let updated = diesel::update(reviews::table.find(update.id.get()))
                    .set((
                        reviews::content.eq(&update.content),
                        reviews::is_positive.eq(update.is_positive),
                    ))
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(DieselError::NotFound);
                }
                load_review(conn, update.id.get())
                    .await?
                    .ok_or(DieselError::NotFound)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, context))
    }

    async fn delete(&self, id: ReviewId) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let context = ReviewContext {
            review: Some(id),
            ..ReviewContext::default()
        };
        // Votes cascade.
        let deleted = diesel::delete(reviews::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, context))?;
        if deleted == 0 {
            return Err(ReviewRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        load_review(&mut pooled, id.get())
            .await
            .map_err(|err| map_diesel_error(err, ReviewContext::default()))
    }

    async fn list(&self, query: ReviewListQuery) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let mut listed = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let mut select = reviews::table.select(ReviewRow::as_select()).into_boxed();
                    if let Some(film_id) = query.film_id {
                        select = select.filter(reviews::film_id.eq(film_id.get()));
                    }
                    let rows: Vec<ReviewRow> = select.load(conn).await?;
                    score(conn, rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, ReviewContext::default()))?;

        sort_by_usefulness(&mut listed);
        listed.truncate(query.count);
        Ok(listed)
    }

    async fn cast_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let context = ReviewContext {
            review: Some(review_id),
            user: Some(user_id),
            ..ReviewContext::default()
        };
        diesel::insert_into(review_votes::table)
            .values(&ReviewVoteRow {
                review_id: review_id.get(),
                user_id: user_id.get(),
                is_useful: vote.is_useful(),
            })
            .on_conflict((review_votes::review_id, review_votes::user_id))
            .do_update()
            .set(review_votes::is_useful.eq(excluded(review_votes::is_useful)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, context))
    }

    async fn retract_vote(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        vote: ReviewVote,
    ) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let context = ReviewContext {
            review: Some(review_id),
            ..ReviewContext::default()
        };
        // Only a vote of the named kind is removed.
        diesel::delete(
            review_votes::table
                .filter(review_votes::review_id.eq(review_id.get()))
                .filter(review_votes::user_id.eq(user_id.get()))
                .filter(review_votes::is_useful.eq(vote.is_useful())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(|err| map_diesel_error(err, context))
    }
}
