//! In-memory storage adapter.
//!
//! [`MemoryStore`] implements every repository port over one shared state
//! guarded by a single `RwLock`: writers are serialised and readers never see
//! a half-applied mutation. Identifiers come from per-class
//! [`IdentityAllocator`]s. Cascading deletes run inside the same write lock
//! as the delete itself.
//!
//! Lock poisoning is reported through each port's `Query` error.

mod catalogue;
mod feed;
mod films;
mod reviews;
mod users;

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{
    AssociationIndex, EventId, FeedEvent, Film, FilmDraft, FilmId, Genre, GenreId,
    IdentityAllocator, Rating, RatingId, Review, ReviewId, ReviewVote, User, UserId, seed_genres,
    seed_ratings, useful_score,
};

/// The shared lock was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("in-memory store lock poisoned")]
pub(crate) struct LockPoisoned;

/// In-memory implementation of all repository ports.
///
/// # Examples
/// ```
/// use backend::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// # let _ = store;
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    film_ids: IdentityAllocator<FilmId>,
    user_ids: IdentityAllocator<UserId>,
    review_ids: IdentityAllocator<ReviewId>,
    event_ids: IdentityAllocator<EventId>,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Films as stored; like sets live in `likes`.
    films: BTreeMap<FilmId, Film>,
    likes: AssociationIndex<FilmId, UserId>,
    /// Users as stored; friend sets live in `friends`.
    users: BTreeMap<UserId, User>,
    friends: AssociationIndex<UserId, UserId>,
    /// Reviews as stored; scores are derived from `votes`.
    reviews: BTreeMap<ReviewId, Review>,
    votes: BTreeMap<ReviewId, BTreeMap<UserId, ReviewVote>>,
    events: Vec<FeedEvent>,
    ratings: BTreeMap<RatingId, Rating>,
    genres: BTreeMap<GenreId, Genre>,
}

impl MemoryStore {
    /// An empty store with the rating and genre catalogues seeded.
    #[must_use]
    pub fn new() -> Self {
        let state = MemoryState {
            ratings: seed_ratings()
                .into_iter()
                .map(|rating| (rating.id, rating))
                .collect(),
            genres: seed_genres()
                .into_iter()
                .map(|genre| (genre.id, genre))
                .collect(),
            ..MemoryState::default()
        };
        Self {
            state: RwLock::new(state),
            film_ids: IdentityAllocator::new(),
            user_ids: IdentityAllocator::new(),
            review_ids: IdentityAllocator::new(),
            event_ids: IdentityAllocator::new(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, LockPoisoned> {
        self.state.read().map_err(|_| LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, LockPoisoned> {
        self.state.write().map_err(|_| LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryState {
    fn film_view(&self, film: &Film) -> Film {
        Film {
            likes: self.likes.members(&film.id),
            ..film.clone()
        }
    }

    fn user_view(&self, user: &User) -> User {
        User {
            friends: self.friends.members(&user.id),
            ..user.clone()
        }
    }

    fn review_view(&self, review: &Review) -> Review {
        let useful = self
            .votes
            .get(&review.id)
            .map(|votes| useful_score(votes.values().copied()))
            .unwrap_or_default();
        Review {
            useful,
            ..review.clone()
        }
    }

    /// Build the stored form of a film, resolving catalogue references.
    fn resolve_film(&self, id: FilmId, draft: &FilmDraft) -> Result<Film, String> {
        let mpa = match draft.mpa {
            Some(rating_id) => Some(
                self.ratings
                    .get(&rating_id)
                    .cloned()
                    .ok_or_else(|| format!("rating {rating_id} not found"))?,
            ),
            None => None,
        };
        let mut genre_ids = draft.genres.clone();
        genre_ids.sort_unstable();
        genre_ids.dedup();
        let genres = genre_ids
            .into_iter()
            .map(|genre_id| {
                self.genres
                    .get(&genre_id)
                    .cloned()
                    .ok_or_else(|| format!("genre {genre_id} not found"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Film {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            release_date: draft.release_date,
            duration: draft.duration,
            mpa,
            genres,
            likes: Default::default(),
        })
    }

    fn email_owner(&self, email: &str) -> Option<UserId> {
        self.users
            .values()
            .find(|user| user.email == email)
            .map(|user| user.id)
    }

    fn remove_review(&mut self, id: ReviewId) -> Option<Review> {
        self.votes.remove(&id);
        self.reviews.remove(&id)
    }

    fn remove_film(&mut self, id: FilmId) -> Option<Film> {
        let film = self.films.remove(&id)?;
        self.likes.remove_key(&id);
        let orphaned: Vec<ReviewId> = self
            .reviews
            .values()
            .filter(|review| review.film_id == id)
            .map(|review| review.id)
            .collect();
        for review_id in orphaned {
            self.remove_review(review_id);
        }
        Some(film)
    }

    fn remove_user(&mut self, id: UserId) -> Option<User> {
        let user = self.users.remove(&id)?;
        self.friends.remove_key(&id);
        self.friends.remove_member(&id);
        self.likes.remove_member(&id);
        let authored: Vec<ReviewId> = self
            .reviews
            .values()
            .filter(|review| review.user_id == id)
            .map(|review| review.id)
            .collect();
        for review_id in authored {
            self.remove_review(review_id);
        }
        for votes in self.votes.values_mut() {
            votes.remove(&id);
        }
        Some(user)
    }
}
