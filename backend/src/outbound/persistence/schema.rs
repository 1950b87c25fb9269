//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes the schema, regenerate this file with `diesel print-schema` or edit
//! it by hand to match.

diesel::table! {
    /// MPA rating catalogue, seeded by migration.
    ratings (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    /// Genre catalogue, seeded by migration.
    genres (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    /// Films; `id` is a BIGSERIAL unless the caller supplied one.
    films (id) {
        id -> Int8,
        name -> Varchar,
        /// At most 200 characters.
        description -> Varchar,
        release_date -> Date,
        /// Minutes; checked positive.
        duration -> Int4,
        rating_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Genre membership; rows cascade with the film.
    film_genres (film_id, genre_id) {
        film_id -> Int8,
        genre_id -> Int8,
    }
}

diesel::table! {
    /// Users; `email` is unique through `users_email_unique`.
    users (id) {
        id -> Int8,
        email -> Varchar,
        login -> Varchar,
        name -> Varchar,
        birthday -> Nullable<Date>,
    }
}

diesel::table! {
    film_likes (film_id, user_id) {
        film_id -> Int8,
        user_id -> Int8,
    }
}

diesel::table! {
    /// Directed friendships: `user_id` added `friend_id`.
    friendships (user_id, friend_id) {
        user_id -> Int8,
        friend_id -> Int8,
    }
}

diesel::table! {
    reviews (id) {
        id -> Int8,
        film_id -> Int8,
        user_id -> Int8,
        content -> Text,
        is_positive -> Bool,
    }
}

diesel::table! {
    /// At most one vote per user and review.
    review_votes (review_id, user_id) {
        review_id -> Int8,
        user_id -> Int8,
        is_useful -> Bool,
    }
}

diesel::table! {
    /// Append-only activity feed.
    feed_events (id) {
        id -> Int8,
        user_id -> Int8,
        event_type -> Varchar,
        operation -> Varchar,
        entity_id -> Int8,
        occurred_at -> Timestamptz,
    }
}

diesel::joinable!(films -> ratings (rating_id));
diesel::joinable!(film_genres -> films (film_id));
diesel::joinable!(film_genres -> genres (genre_id));
diesel::joinable!(film_likes -> films (film_id));
diesel::joinable!(film_likes -> users (user_id));
diesel::joinable!(reviews -> films (film_id));
diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(review_votes -> reviews (review_id));

diesel::allow_tables_to_appear_in_same_query!(
    ratings,
    genres,
    films,
    film_genres,
    users,
    film_likes,
    friendships,
    reviews,
    review_votes,
    feed_events,
);
