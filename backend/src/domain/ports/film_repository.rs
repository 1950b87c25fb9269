//! Port abstraction for film storage adapters.
//!
//! Adapters own the like sets alongside the films, so reads always return a
//! film with its current likes merged in and deleting a film drops its likes,
//! genre links and reviews.

use async_trait::async_trait;

use crate::domain::{Film, FilmDraft, FilmId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by film repository adapters.
    pub enum FilmRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "film repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "film repository query failed: {message}",
        /// No film is stored under the identifier.
        NotFound { id: i64 } => "film {id} not found",
        /// A film is already stored under the explicit identifier.
        Duplicate { id: i64 } => "film {id} already exists",
        /// A rating, genre or user reference does not resolve.
        UnknownReference { message: String } => "{message}",
        /// The backend cannot perform the operation.
        Unsupported { operation: String } => "film storage does not support {operation}",
    }
}

/// Keyed storage for films and their like sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Store a new film, allocating an identifier when the draft has none.
    async fn create(&self, draft: &FilmDraft) -> Result<Film, FilmRepositoryError>;

    /// Replace every stored field except the like set.
    async fn update(&self, id: FilmId, draft: &FilmDraft) -> Result<Film, FilmRepositoryError>;

    /// Remove a film and everything hanging off it.
    async fn delete(&self, id: FilmId) -> Result<(), FilmRepositoryError>;

    /// Fetch a film by identifier.
    async fn find_by_id(&self, id: FilmId) -> Result<Option<Film>, FilmRepositoryError>;

    /// All films in ascending identifier order.
    async fn list(&self) -> Result<Vec<Film>, FilmRepositoryError>;

    /// Record that a user likes a film. Repeating the call is a no-op.
    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), FilmRepositoryError>;

    /// Withdraw a like. Removing an absent like succeeds.
    async fn remove_like(
        &self,
        film_id: FilmId,
        user_id: UserId,
    ) -> Result<(), FilmRepositoryError>;
}
