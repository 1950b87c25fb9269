//! PostgreSQL-backed `FeedRepository` implementation using Diesel ORM.
//!
//! Event types and operations are stored as their upper-case labels. Rows are
//! never updated or deleted.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FeedRepository, FeedRepositoryError};
use crate::domain::{EventId, EventType, FeedEvent, NewFeedEvent, Operation, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{FeedEventRow, NewFeedEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::feed_events;

/// Diesel-backed implementation of the [`FeedRepository`] port.
#[derive(Clone)]
pub struct DieselFeedRepository {
    pool: DbPool,
}

impl DieselFeedRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedRepositoryError {
    FeedRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: DieselError) -> FeedRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => FeedRepositoryError::connection(message),
        DieselFailure::NotFound => FeedRepositoryError::query("record not found"),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            FeedRepositoryError::query("constraint violation")
        }
        DieselFailure::Query(message) => FeedRepositoryError::query(message),
    }
}

fn event_from_row(row: FeedEventRow) -> Result<FeedEvent, FeedRepositoryError> {
    let event_type: EventType = row
        .event_type
        .parse()
        .map_err(|err| FeedRepositoryError::query(format!("feed event {}: {err}", row.id)))?;
    let operation: Operation = row
        .operation
        .parse()
        .map_err(|err| FeedRepositoryError::query(format!("feed event {}: {err}", row.id)))?;
    Ok(FeedEvent {
        event_id: EventId::new(row.id),
        timestamp: row.occurred_at,
        user_id: UserId::new(row.user_id),
        event_type,
        operation,
        entity_id: row.entity_id,
    })
}

#[async_trait]
impl FeedRepository for DieselFeedRepository {
    async fn append(&self, event: &NewFeedEvent) -> Result<FeedEvent, FeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: FeedEventRow = diesel::insert_into(feed_events::table)
            .values(&NewFeedEventRow {
                user_id: event.user_id.get(),
                event_type: event.event_type.as_str(),
                operation: event.operation.as_str(),
                entity_id: event.entity_id,
                occurred_at: event.timestamp,
            })
            .returning(FeedEventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        event_from_row(row)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FeedEvent>, FeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FeedEventRow> = feed_events::table
            .filter(feed_events::user_id.eq(user_id.get()))
            .select(FeedEventRow::as_select())
            .order_by((feed_events::occurred_at, feed_events::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(event_from_row).collect()
    }
}
