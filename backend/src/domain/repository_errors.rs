//! Translation of repository port errors into domain errors.
//!
//! Every service maps adapter failures the same way: connection problems
//! become `service_unavailable`, query failures `internal_error`, and
//! semantic outcomes keep their meaning.

use serde_json::json;
use tracing::{error, warn};

use super::Error;
use super::ports::{
    CatalogueRepositoryError, FeedRepositoryError, FilmRepositoryError, ReviewRepositoryError,
    UserRepositoryError,
};

fn unavailable(store: &str, message: String) -> Error {
    warn!(store, %message, "repository unavailable");
    Error::service_unavailable(format!("{store} repository unavailable: {message}"))
}

fn failed(store: &str, message: String) -> Error {
    error!(store, %message, "repository query failed");
    Error::internal(format!("{store} repository error: {message}"))
}

pub(crate) fn map_film_error(err: FilmRepositoryError) -> Error {
    let display = err.to_string();
    match err {
        FilmRepositoryError::Connection { message } => unavailable("film", message),
        FilmRepositoryError::Query { message } => failed("film", message),
        FilmRepositoryError::NotFound { .. } | FilmRepositoryError::UnknownReference { .. } => {
            Error::not_found(display)
        }
        FilmRepositoryError::Duplicate { .. } => Error::already_exists(display),
        FilmRepositoryError::Unsupported { .. } => Error::unsupported(display),
    }
}

pub(crate) fn map_user_error(err: UserRepositoryError) -> Error {
    let display = err.to_string();
    match err {
        UserRepositoryError::Connection { message } => unavailable("user", message),
        UserRepositoryError::Query { message } => failed("user", message),
        UserRepositoryError::NotFound { .. } => Error::not_found(display),
        UserRepositoryError::Duplicate { .. } => Error::already_exists(display),
        UserRepositoryError::EmailTaken { .. } => {
            Error::already_exists(display).with_details(json!({ "field": "email" }))
        }
        UserRepositoryError::Unsupported { .. } => Error::unsupported(display),
    }
}

pub(crate) fn map_review_error(err: ReviewRepositoryError) -> Error {
    let display = err.to_string();
    match err {
        ReviewRepositoryError::Connection { message } => unavailable("review", message),
        ReviewRepositoryError::Query { message } => failed("review", message),
        ReviewRepositoryError::NotFound { .. } | ReviewRepositoryError::UnknownReference { .. } => {
            Error::not_found(display)
        }
        ReviewRepositoryError::Duplicate { .. } => Error::already_exists(display),
        ReviewRepositoryError::Unsupported { .. } => Error::unsupported(display),
    }
}

pub(crate) fn map_feed_error(err: FeedRepositoryError) -> Error {
    let display = err.to_string();
    match err {
        FeedRepositoryError::Connection { message } => unavailable("feed", message),
        FeedRepositoryError::Query { message } => failed("feed", message),
        FeedRepositoryError::Unsupported { .. } => Error::unsupported(display),
    }
}

pub(crate) fn map_catalogue_error(err: CatalogueRepositoryError) -> Error {
    let display = err.to_string();
    match err {
        CatalogueRepositoryError::Connection { message } => unavailable("catalogue", message),
        CatalogueRepositoryError::Query { message } => failed("catalogue", message),
        CatalogueRepositoryError::Unsupported { .. } => Error::unsupported(display),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(FilmRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(FilmRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(FilmRepositoryError::not_found(3_i64), ErrorCode::NotFound)]
    #[case(FilmRepositoryError::unknown_reference("rating 9 not found"), ErrorCode::NotFound)]
    #[case(FilmRepositoryError::duplicate(3_i64), ErrorCode::AlreadyExists)]
    #[case(FilmRepositoryError::unsupported("search"), ErrorCode::Unsupported)]
    fn film_errors_map_to_codes(#[case] err: FilmRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_film_error(err).code(), code);
    }

    #[rstest]
    fn email_conflicts_name_the_field() {
        let err = map_user_error(UserRepositoryError::email_taken("a@b.c"));
        assert_eq!(err.code(), ErrorCode::AlreadyExists);
        assert_eq!(err.details(), Some(&json!({ "field": "email" })));
        assert!(err.message().contains("a@b.c"));
    }

    #[rstest]
    fn not_found_messages_carry_the_id() {
        let err = map_review_error(ReviewRepositoryError::not_found(12_i64));
        assert_eq!(err.message(), "review 12 not found");
    }

    #[rstest]
    #[case(FeedRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[case(FeedRepositoryError::unsupported("feed"), ErrorCode::Unsupported)]
    fn feed_errors_map_to_codes(#[case] err: FeedRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_feed_error(err).code(), code);
    }

    #[rstest]
    fn catalogue_connection_is_unavailable() {
        let err = map_catalogue_error(CatalogueRepositoryError::connection("down"));
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
