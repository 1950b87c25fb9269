//! Film reviews and the votes other users cast on them.

use serde::{Deserialize, Serialize};

use super::{FilmId, ReviewId, UserId};

/// Number of reviews listed when no count is given.
pub const DEFAULT_REVIEW_COUNT: usize = 10;

/// Input payload for posting a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub id: Option<ReviewId>,
    pub film_id: FilmId,
    pub user_id: UserId,
    pub content: String,
    pub is_positive: bool,
}

/// Replacement content for an existing review. Film and author never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub id: ReviewId,
    pub content: String,
    pub is_positive: bool,
}

/// A stored review with its usefulness score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "reviewId")]
    pub id: ReviewId,
    pub film_id: FilmId,
    pub user_id: UserId,
    pub content: String,
    pub is_positive: bool,
    /// Useful votes minus not-useful votes.
    #[serde(default)]
    pub useful: i64,
}

/// A user's verdict on someone else's review. One per user per review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewVote {
    Useful,
    NotUseful,
}

impl ReviewVote {
    /// Contribution of this vote to a review's usefulness score.
    #[must_use]
    pub const fn score(self) -> i64 {
        match self {
            Self::Useful => 1,
            Self::NotUseful => -1,
        }
    }

    /// Whether the vote counts the review as useful.
    #[must_use]
    pub const fn is_useful(self) -> bool {
        matches!(self, Self::Useful)
    }

    /// Inverse of [`is_useful`](Self::is_useful).
    #[must_use]
    pub const fn from_useful(useful: bool) -> Self {
        if useful { Self::Useful } else { Self::NotUseful }
    }
}

/// Sum the score of a set of votes.
pub fn useful_score(votes: impl IntoIterator<Item = ReviewVote>) -> i64 {
    votes.into_iter().map(ReviewVote::score).sum()
}

/// Filter for listing reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewListQuery {
    pub film_id: Option<FilmId>,
    pub count: usize,
}

impl Default for ReviewListQuery {
    fn default() -> Self {
        Self {
            film_id: None,
            count: DEFAULT_REVIEW_COUNT,
        }
    }
}

/// Order reviews most useful first, then by ascending id.
pub fn sort_by_usefulness(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.useful.cmp(&a.useful).then(a.id.cmp(&b.id)));
}
