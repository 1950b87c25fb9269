//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository port has a Diesel implementation sharing one `bb8` pool
//! through `diesel-async`.
//!
//! - **Thin adapters**: repositories translate between row structs and domain
//!   entities; no business rules live here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) stay private to this module.
//! - **Constraint-backed invariants**: email uniqueness and cascading deletes
//!   are enforced by the schema and surfaced as port errors.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselFilmRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cinegraph")).await?;
//! let films = DieselFilmRepository::new(pool);
//! ```

mod diesel_catalogue_repository;
mod diesel_error_mapping;
mod diesel_feed_repository;
mod diesel_film_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_feed_repository::DieselFeedRepository;
pub use diesel_film_repository::DieselFilmRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
