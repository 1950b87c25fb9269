//! Read-only reference catalogues: MPA ratings and genres.
//!
//! Both catalogues are seeded once when the store starts and never change
//! afterwards. Films reference entries by id.

use serde::{Deserialize, Serialize};

use super::{GenreId, RatingId};

/// An MPA film rating such as `PG-13`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub name: String,
}

/// A film genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

const SEED_RATINGS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];

const SEED_GENRES: [&str; 6] = [
    "Comedy",
    "Drama",
    "Animation",
    "Thriller",
    "Documentary",
    "Action",
];

/// The rating catalogue in id order, ids starting at 1.
///
/// The PostgreSQL migration seeds the same rows.
#[must_use]
pub fn seed_ratings() -> Vec<Rating> {
    (1_i64..)
        .zip(SEED_RATINGS)
        .map(|(id, name)| Rating {
            id: RatingId::new(id),
            name: name.to_owned(),
        })
        .collect()
}

/// The genre catalogue in id order, ids starting at 1.
#[must_use]
pub fn seed_genres() -> Vec<Genre> {
    (1_i64..)
        .zip(SEED_GENRES)
        .map(|(id, name)| Genre {
            id: GenreId::new(id),
            name: name.to_owned(),
        })
        .collect()
}
