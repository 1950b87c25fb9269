//! Domain primitives, services and ports.
//!
//! Purpose: define the film catalogue's entities and rules independently of
//! HTTP and storage. Inbound adapters call the driving ports implemented by
//! the services here; outbound adapters implement the repository ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Film, User, Review, FeedEvent, Rating, Genre: entities.
//! - FilmService, UserService, ReviewService, CatalogueService: driving port
//!   implementations.
//! - IdentityAllocator, AssociationIndex: building blocks for stores.

pub mod associations;
mod catalogue;
mod catalogue_service;
pub mod error;
mod feed;
mod film;
mod film_service;
mod identity;
pub mod ports;
pub(crate) mod repository_errors;
mod review;
mod review_service;
pub mod trace_id;
mod user;
mod user_service;
pub mod validation;

pub use self::associations::AssociationIndex;
pub use self::catalogue::{Genre, Rating, seed_genres, seed_ratings};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::feed::{
    EventType, FeedEvent, FeedRecorder, NewFeedEvent, Operation, ParseFeedLabelError,
    sort_chronologically,
};
pub use self::film::{
    DEFAULT_POPULAR_COUNT, Film, FilmDraft, FilmSearch, MAX_DESCRIPTION_CHARS,
    ParseSearchFieldError, PopularFilmsQuery, SearchField, earliest_release_date,
};
pub use self::film_service::FilmService;
pub use self::identity::{
    EventId, FilmId, GenreId, Identifier, IdentityAllocator, RatingId, ReviewId, UserId,
};
pub use self::review::{
    DEFAULT_REVIEW_COUNT, Review, ReviewDraft, ReviewListQuery, ReviewUpdate, ReviewVote,
    sort_by_usefulness, useful_score,
};
pub use self::review_service::ReviewService;
pub use self::trace_id::TraceId;
pub use self::user::{User, UserDraft};
pub use self::user_service::UserService;
pub use self::validation::{FilmValidationError, ReviewValidationError, UserValidationError};

/// Convenient result alias for driving-port calls.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("film 1 not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
