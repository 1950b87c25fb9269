//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by the storage adapters in
//! `outbound`. Driving ports (`*Command`, `*Query`) are implemented by the
//! domain services and consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_query;
mod catalogue_repository;
mod feed_repository;
mod film_command;
mod film_query;
mod film_repository;
mod review_command;
mod review_query;
mod review_repository;
mod user_command;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{
    CatalogueRepository, CatalogueRepositoryError, FixtureCatalogueRepository,
};
#[cfg(test)]
pub use feed_repository::MockFeedRepository;
pub use feed_repository::{FeedRepository, FeedRepositoryError};
#[cfg(test)]
pub use film_command::MockFilmCommand;
pub use film_command::FilmCommand;
#[cfg(test)]
pub use film_query::MockFilmQuery;
pub use film_query::FilmQuery;
#[cfg(test)]
pub use film_repository::MockFilmRepository;
pub use film_repository::{FilmRepository, FilmRepositoryError};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::ReviewCommand;
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::ReviewQuery;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
