//! Film entities and film query parameters.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FilmId, Genre, GenreId, Rating, RatingId, UserId};

/// Longest accepted film description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Number of films returned by the popularity ranking when no count is given.
pub const DEFAULT_POPULAR_COUNT: usize = 10;

/// Earliest release date a film may carry: the first public film screening.
#[must_use]
pub fn earliest_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).unwrap_or(NaiveDate::MIN)
}

/// Input payload for creating or replacing a film.
///
/// Catalogue entries are referenced by id and resolved by the store. The
/// like set is never part of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmDraft {
    pub id: Option<FilmId>,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: Option<RatingId>,
    pub genres: Vec<GenreId>,
}

impl FilmDraft {
    /// Sort genre references by id and drop duplicates.
    pub fn normalise_genres(&mut self) {
        self.genres.sort_unstable();
        self.genres.dedup();
    }
}

/// A stored film with its catalogue references resolved and its current
/// like set merged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: FilmId,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: Option<Rating>,
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub likes: BTreeSet<UserId>,
}

impl Film {
    /// Number of users currently liking the film.
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Whether the film carries the given genre.
    #[must_use]
    pub fn has_genre(&self, genre_id: GenreId) -> bool {
        self.genres.iter().any(|genre| genre.id == genre_id)
    }
}

/// Parameters of the most-popular ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularFilmsQuery {
    pub count: usize,
    pub genre_id: Option<GenreId>,
    pub year: Option<i32>,
}

impl Default for PopularFilmsQuery {
    fn default() -> Self {
        Self {
            count: DEFAULT_POPULAR_COUNT,
            genre_id: None,
            year: None,
        }
    }
}

/// Film attribute a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    /// Accepted for compatibility; no backend indexes directors.
    Director,
}

/// Error returned when parsing an unknown [`SearchField`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search field `{0}`; expected `title` or `director`")]
pub struct ParseSearchFieldError(String);

impl FromStr for SearchField {
    type Err = ParseSearchFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "director" => Ok(Self::Director),
            _ => Err(ParseSearchFieldError(value.to_owned())),
        }
    }
}

/// A title search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmSearch {
    pub query: String,
    pub by: Vec<SearchField>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn normalise_genres_sorts_and_deduplicates() {
        let mut draft = FilmDraft {
            id: None,
            name: "Alien".into(),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(1979, 5, 25).expect("date"),
            duration: 117,
            mpa: None,
            genres: vec![GenreId::new(4), GenreId::new(1), GenreId::new(4)],
        };
        draft.normalise_genres();
        assert_eq!(draft.genres, vec![GenreId::new(1), GenreId::new(4)]);
    }

    #[rstest]
    #[case("title", SearchField::Title)]
    #[case(" Director ", SearchField::Director)]
    fn parses_search_fields(#[case] raw: &str, #[case] expected: SearchField) {
        assert_eq!(raw.parse::<SearchField>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_search_field() {
        assert!("year".parse::<SearchField>().is_err());
    }

    #[rstest]
    fn serialises_release_date_as_iso_date() {
        let film = Film {
            id: FilmId::new(1),
            name: "Metropolis".into(),
            description: "Silent science fiction".into(),
            release_date: NaiveDate::from_ymd_opt(1927, 1, 10).expect("date"),
            duration: 153,
            mpa: None,
            genres: Vec::new(),
            likes: BTreeSet::from([UserId::new(2)]),
        };
        let value = serde_json::to_value(&film).expect("serialise film");
        assert_eq!(value["releaseDate"], "1927-01-10");
        assert_eq!(value["likes"], serde_json::json!([2]));
    }
}
