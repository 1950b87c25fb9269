//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `users_email_unique` constraint and
//! reported as [`UserRepositoryError::EmailTaken`]. Friendships are directed
//! rows in `friendships`; deleting a user cascades them in both directions.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserDraft, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{FriendshipRow, NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{friendships, users};

const EMAIL_CONSTRAINT: &str = "users_email_unique";

const SYNC_USER_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('users', 'id'), \
     (SELECT COALESCE(MAX(id), 1) FROM users))";

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

/// Map a Diesel failure while writing `user`, optionally with `email`.
fn map_diesel_error(
    error: DieselError,
    user: Option<UserId>,
    email: Option<&str>,
) -> UserRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.is_unique_on(EMAIL_CONSTRAINT) {
        return UserRepositoryError::email_taken(email.unwrap_or_default());
    }
    if failure.is_unique_on("users_pkey") {
        return user.map_or_else(
            || UserRepositoryError::query("duplicate user id"),
            UserRepositoryError::duplicate,
        );
    }
    match failure {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::NotFound => user.map_or_else(
            || UserRepositoryError::query("record not found"),
            UserRepositoryError::not_found,
        ),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            UserRepositoryError::query("constraint violation")
        }
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

/// Friendship rows reference two users; name the missing one.
fn map_friendship_error(error: DieselError, user: UserId, friend: UserId) -> UserRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.is_foreign_key_on("friend_id") {
        return UserRepositoryError::not_found(friend);
    }
    if failure.is_foreign_key_on("user_id") {
        return UserRepositoryError::not_found(user);
    }
    match failure {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::NotFound => UserRepositoryError::not_found(user),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            UserRepositoryError::query("constraint violation")
        }
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

/// Attach friend sets to `rows`.
async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<UserRow>,
) -> Result<Vec<User>, DieselError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let edges: Vec<FriendshipRow> = friendships::table
        .filter(friendships::user_id.eq_any(&ids))
        .select(FriendshipRow::as_select())
        .load(conn)
        .await?;
    let mut friends_by_user: BTreeMap<i64, BTreeSet<UserId>> = BTreeMap::new();
    for edge in edges {
        friends_by_user
            .entry(edge.user_id)
            .or_default()
            .insert(UserId::new(edge.friend_id));
    }

    Ok(rows
        .into_iter()
        .map(|row| User {
            id: UserId::new(row.id),
            friends: friends_by_user.remove(&row.id).unwrap_or_default(),
            email: row.email,
            login: row.login,
            name: row.name,
            birthday: row.birthday,
        })
        .collect())
}

async fn load_user(conn: &mut AsyncPgConnection, id: i64) -> Result<Option<User>, DieselError> {
    let row: Option<UserRow> = users::table
        .find(id)
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![row]).await?.into_iter().next())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, draft: &UserDraft) -> Result<User, UserRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        let row: UserRow = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let new_row = NewUserRow {
                        id: draft.id.map(UserId::get),
                        email: &draft.email,
                        login: &draft.login,
                        name: draft.effective_name(),
                        birthday: draft.birthday,
                    };
                    let row: UserRow = diesel::insert_into(users::table)
                        .values(&new_row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;
                    if draft.id.is_some() {
                        diesel::sql_query(SYNC_USER_SEQUENCE).execute(conn).await?;
                    }
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, draft.id, Some(draft.email.as_str())))?;

        Ok(User {
            id: UserId::new(row.id),
            email: row.email,
            login: row.login,
            name: row.name,
            birthday: row.birthday,
            friends: BTreeSet::new(),
        })
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<User, UserRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let changes = UserUpdate {
                    email: &draft.email,
                    login: &draft.login,
                    name: draft.effective_name(),
                    birthday: draft.birthday,
                };
                let updated = diesel::update(users::table.find(id.get()))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(DieselError::NotFound);
                }
                load_user(conn, id.get()).await?.ok_or(DieselError::NotFound)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, Some(id), Some(draft.email.as_str())))
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Friendships, likes, reviews and votes cascade; feed rows stay.
        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(id), None))?;
        if deleted == 0 {
            return Err(UserRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        load_user(&mut pooled, id.get())
            .await
            .map_err(|err| map_diesel_error(err, None, None))
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let rows: Vec<UserRow> = users::table
                    .select(UserRow::as_select())
                    .order_by(users::id)
                    .load(conn)
                    .await?;
                assemble(conn, rows).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, None, None))
    }

    async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(friendships::table)
            .values(&FriendshipRow {
                user_id: user_id.get(),
                friend_id: friend_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_friendship_error(err, user_id, friend_id))
    }

    async fn remove_friend(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            friendships::table
                .filter(friendships::user_id.eq(user_id.get()))
                .filter(friendships::friend_id.eq(friend_id.get())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(|err| map_friendship_error(err, user_id, friend_id))
    }

    async fn friends_of(&self, user_id: UserId) -> Result<Vec<User>, UserRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                let friend_ids: Vec<i64> = friendships::table
                    .filter(friendships::user_id.eq(user_id.get()))
                    .select(friendships::friend_id)
                    .load(conn)
                    .await?;
                let rows: Vec<UserRow> = users::table
                    .filter(users::id.eq_any(&friend_ids))
                    .select(UserRow::as_select())
                    .order_by(users::id)
                    .load(conn)
                    .await?;
                assemble(conn, rows).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, Some(user_id), None))
    }
}
