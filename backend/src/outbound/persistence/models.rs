//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain entities live next
//! to the repositories that use them.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{
    feed_events, film_genres, film_likes, films, friendships, genres, ratings, review_votes,
    reviews, users,
};

// ---------------------------------------------------------------------------
// Catalogue models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RatingRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = genres)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GenreRow {
    pub id: i64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Film models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = films)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FilmRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub rating_id: Option<i64>,
}

/// Insertable film; a `None` id falls back to the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = films)]
pub(crate) struct NewFilmRow<'a> {
    pub id: Option<i64>,
    pub name: &'a str,
    pub description: &'a str,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub rating_id: Option<i64>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = films)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct FilmUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub rating_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = film_genres)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FilmGenreRow {
    pub film_id: i64,
    pub genre_id: i64,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = film_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FilmLikeRow {
    pub film_id: i64,
    pub user_id: i64,
}

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Option<i64>,
    pub email: &'a str,
    pub login: &'a str,
    pub name: &'a str,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub email: &'a str,
    pub login: &'a str,
    pub name: &'a str,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = friendships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FriendshipRow {
    pub user_id: i64,
    pub friend_id: i64,
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub film_id: i64,
    pub user_id: i64,
    pub content: String,
    pub is_positive: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Option<i64>,
    pub film_id: i64,
    pub user_id: i64,
    pub content: &'a str,
    pub is_positive: bool,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = review_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewVoteRow {
    pub review_id: i64,
    pub user_id: i64,
    pub is_useful: bool,
}

// ---------------------------------------------------------------------------
// Feed models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feed_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedEventRow {
    pub id: i64,
    pub user_id: i64,
    pub event_type: String,
    pub operation: String,
    pub entity_id: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feed_events)]
pub(crate) struct NewFeedEventRow<'a> {
    pub user_id: i64,
    pub event_type: &'a str,
    pub operation: &'a str,
    pub entity_id: i64,
    pub occurred_at: DateTime<Utc>,
}
