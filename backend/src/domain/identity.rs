//! Entity identifiers and the per-class identity allocator.
//!
//! Every entity class uses its own integer identifier newtype so a film id
//! can never be passed where a user id is expected. Identifiers are assigned
//! by an [`IdentityAllocator`], one per entity class, which hands out strictly
//! increasing values starting at 1.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

/// Common behaviour of integer entity identifiers.
pub trait Identifier:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Wrap a raw integer.
    fn from_raw(raw: i64) -> Self;

    /// The raw integer value.
    fn raw(self) -> i64;
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw integer identifier.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw integer value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Identifier for $name {
            fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            fn raw(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id! {
    /// Identifier of a film.
    FilmId
}
define_id! {
    /// Identifier of a registered user.
    UserId
}
define_id! {
    /// Identifier of a film review.
    ReviewId
}
define_id! {
    /// Identifier of a feed event.
    EventId
}
define_id! {
    /// Identifier of a genre catalogue entry.
    GenreId
}
define_id! {
    /// Identifier of an MPA rating catalogue entry.
    RatingId
}

/// Hands out unique, strictly increasing identifiers for one entity class.
///
/// Allocation is a single atomic increment, so concurrent callers never
/// observe the same value. When an entity is stored under a caller-supplied
/// identifier, [`observe`](Self::observe) moves the counter past it.
///
/// # Examples
/// ```
/// use backend::domain::{FilmId, IdentityAllocator};
///
/// let allocator = IdentityAllocator::<FilmId>::new();
/// assert_eq!(allocator.allocate(), FilmId::new(1));
/// allocator.observe(FilmId::new(10));
/// assert_eq!(allocator.allocate(), FilmId::new(11));
/// ```
#[derive(Debug)]
pub struct IdentityAllocator<T> {
    next: AtomicI64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Identifier> IdentityAllocator<T> {
    /// Create an allocator whose first identifier is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(1),
            _marker: PhantomData,
        }
    }

    /// Take the next identifier.
    pub fn allocate(&self) -> T {
        T::from_raw(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Record an externally chosen identifier so later allocations skip it.
    pub fn observe(&self, id: T) {
        self.next
            .fetch_max(id.raw().saturating_add(1), Ordering::SeqCst);
    }
}

impl<T: Identifier> Default for IdentityAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}
