//! Like and friendship aggregation.
//!
//! [`AssociationIndex`] holds directed association sets (film to liking
//! users, user to friends) for the in-memory store. The free functions derive
//! views from film snapshots and work the same whichever backend produced
//! them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use super::{Film, PopularFilmsQuery, UserId};

/// Directed one-to-many association sets.
///
/// # Examples
/// ```
/// use backend::domain::{AssociationIndex, FilmId, UserId};
///
/// let mut likes = AssociationIndex::<FilmId, UserId>::new();
/// likes.insert(FilmId::new(1), UserId::new(7));
/// likes.insert(FilmId::new(1), UserId::new(7));
/// assert_eq!(likes.members(&FilmId::new(1)).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AssociationIndex<K, V> {
    sets: BTreeMap<K, BTreeSet<V>>,
}

impl<K: Ord + Copy, V: Ord + Copy> AssociationIndex<K, V> {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sets: BTreeMap::new(),
        }
    }

    /// Associate `member` with `key`. Returns whether the set changed.
    pub fn insert(&mut self, key: K, member: V) -> bool {
        self.sets.entry(key).or_default().insert(member)
    }

    /// Dissociate `member` from `key`. Returns whether the set changed.
    pub fn remove(&mut self, key: &K, member: &V) -> bool {
        let Some(set) = self.sets.get_mut(key) else {
            return false;
        };
        let removed = set.remove(member);
        if set.is_empty() {
            self.sets.remove(key);
        }
        removed
    }

    /// The members associated with `key`, ascending.
    #[must_use]
    pub fn members(&self, key: &K) -> BTreeSet<V> {
        self.sets.get(key).cloned().unwrap_or_default()
    }

    /// Drop every association of `key`.
    pub fn remove_key(&mut self, key: &K) {
        self.sets.remove(key);
    }

    /// Drop `member` from every set it belongs to.
    pub fn remove_member(&mut self, member: &V) {
        self.sets.retain(|_, set| {
            set.remove(member);
            !set.is_empty()
        });
    }
}

impl<K: Ord + Copy, V: Ord + Copy> Default for AssociationIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Elements present in both sets, ascending.
pub fn intersect<T: Ord + Copy>(left: &BTreeSet<T>, right: &BTreeSet<T>) -> Vec<T> {
    left.intersection(right).copied().collect()
}

/// Sort films by like count descending, then by ascending id.
pub fn sort_by_popularity(films: &mut [Film]) {
    films.sort_by(|a, b| {
        b.like_count()
            .cmp(&a.like_count())
            .then(a.id.cmp(&b.id))
    });
}

/// Rank liked films matching the genre and year filters.
///
/// Only films with at least one like take part. When no film has any like
/// at all, the first `count` films in storage order are returned instead,
/// unfiltered. Filters that match none of the liked films yield nothing.
pub fn most_popular(films: Vec<Film>, query: &PopularFilmsQuery) -> Vec<Film> {
    if films.iter().all(|film| film.like_count() == 0) {
        let mut fallback = films;
        fallback.sort_by_key(|film| film.id);
        fallback.truncate(query.count);
        return fallback;
    }

    let mut ranked: Vec<Film> = films
        .iter()
        .filter(|film| film.like_count() > 0)
        .filter(|film| query.genre_id.is_none_or(|genre| film.has_genre(genre)))
        .filter(|film| query.year.is_none_or(|year| film.release_date.year() == year))
        .cloned()
        .collect();

    sort_by_popularity(&mut ranked);
    ranked.truncate(query.count);
    ranked
}

/// Films liked by both users, most popular first.
pub fn common_films(films: Vec<Film>, first: UserId, second: UserId) -> Vec<Film> {
    let mut shared: Vec<Film> = films
        .into_iter()
        .filter(|film| film.likes.contains(&first) && film.likes.contains(&second))
        .collect();
    sort_by_popularity(&mut shared);
    shared
}

/// Films whose title contains `query`, ignoring case, most popular first.
pub fn search_by_title(films: Vec<Film>, query: &str) -> Vec<Film> {
    let needle = query.to_lowercase();
    let mut matches: Vec<Film> = films
        .into_iter()
        .filter(|film| film.name.to_lowercase().contains(&needle))
        .collect();
    sort_by_popularity(&mut matches);
    matches
}

/// Films to suggest to `target`.
///
/// The most similar user is the one sharing the most liked films with the
/// target, ties going to the lower id. Their liked films that the target has
/// not liked are returned, most popular first. Nobody overlapping means no
/// recommendations.
pub fn recommend(films: Vec<Film>, target: UserId) -> Vec<Film> {
    let mut overlap: BTreeMap<UserId, usize> = BTreeMap::new();
    for film in films.iter().filter(|film| film.likes.contains(&target)) {
        for user in film.likes.iter().filter(|user| **user != target) {
            *overlap.entry(*user).or_default() += 1;
        }
    }

    // Equal counts rank the lower id higher.
    let Some(similar) = overlap
        .into_iter()
        .max_by(|(a_id, a_count), (b_id, b_count)| a_count.cmp(b_count).then(b_id.cmp(a_id)))
        .map(|(user, _)| user)
    else {
        return Vec::new();
    };

    let mut suggestions: Vec<Film> = films
        .into_iter()
        .filter(|film| film.likes.contains(&similar) && !film.likes.contains(&target))
        .collect();
    sort_by_popularity(&mut suggestions);
    suggestions
}
