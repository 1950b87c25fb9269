//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The wrappers mirror the JSON shape of their domain counterparts but live in
//! the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The entity or one of its unique fields is already taken.
    #[schema(rename = "already_exists")]
    AlreadyExists,
    /// The configured backend does not provide the operation.
    #[schema(rename = "unsupported")]
    Unsupported,
    /// The database or pool is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// For batch validation failures `details` maps each field to a message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(rename = "error", example = "request validation failed")]
    message: String,
    /// Correlation identifier echoed in the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details.
    #[schema(example = json!({"duration": "must be positive"}))]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Rating`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Rating)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RatingSchema {
    #[schema(example = 3)]
    id: i64,
    #[schema(example = "PG-13")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::Genre`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Genre)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct GenreSchema {
    #[schema(example = 2)]
    id: i64,
    #[schema(example = "Drama")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::Film`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Film, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FilmSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Alien")]
    name: String,
    /// At most 200 characters.
    #[schema(example = "In space no one can hear you scream.")]
    description: String,
    #[schema(value_type = String, format = Date, example = "1979-05-25")]
    release_date: String,
    /// Running time in minutes.
    #[schema(example = 117)]
    duration: i32,
    mpa: Option<RatingSchema>,
    genres: Vec<GenreSchema>,
    /// Identifiers of users who like the film.
    likes: Vec<i64>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "ada")]
    login: String,
    /// Defaults to the login when blank.
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(value_type = Option<String>, format = Date, example = "1990-12-10")]
    birthday: Option<String>,
    /// Identifiers of users this user has befriended.
    friends: Vec<i64>,
}

/// OpenAPI schema for [`crate::domain::Review`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Review, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ReviewSchema {
    #[schema(example = 1)]
    review_id: i64,
    #[schema(example = 1)]
    film_id: i64,
    #[schema(example = 2)]
    user_id: i64,
    #[schema(example = "Still terrifying.")]
    content: String,
    is_positive: bool,
    /// Useful votes minus not-useful votes.
    #[schema(example = 0)]
    useful: i64,
}

/// OpenAPI schema for [`crate::domain::EventType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::EventType)]
pub enum EventTypeSchema {
    #[schema(rename = "LIKE")]
    Like,
    #[schema(rename = "REVIEW")]
    Review,
    #[schema(rename = "FRIEND")]
    Friend,
}

/// OpenAPI schema for [`crate::domain::Operation`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Operation)]
pub enum OperationSchema {
    #[schema(rename = "ADD")]
    Add,
    #[schema(rename = "REMOVE")]
    Remove,
    #[schema(rename = "UPDATE")]
    Update,
}

/// OpenAPI schema for [`crate::domain::FeedEvent`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FeedEvent, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FeedEventSchema {
    #[schema(example = 1)]
    event_id: i64,
    /// Milliseconds since the Unix epoch.
    #[schema(example = 1_717_232_400_000_i64)]
    timestamp: i64,
    #[schema(example = 1)]
    user_id: i64,
    event_type: EventTypeSchema,
    operation: OperationSchema,
    /// Film, friend or review the event refers to.
    #[schema(example = 4)]
    entity_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("\"error\""));
        assert!(json.contains("traceId"));
    }

    #[rstest]
    fn error_codes_cover_every_variant() {
        let json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "not_found",
            "already_exists",
            "unsupported",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn film_schema_is_camel_case() {
        assert_eq!(FilmSchema::name(), "crate.domain.Film");
        let json = schema_to_json::<FilmSchema>();
        assert!(json.contains("releaseDate"));
        assert!(!json.contains("release_date"));
    }

    #[rstest]
    fn review_schema_exposes_review_id() {
        let json = schema_to_json::<ReviewSchema>();
        assert!(json.contains("reviewId"));
        assert!(json.contains("isPositive"));
    }

    #[rstest]
    fn feed_event_labels_are_upper_case() {
        let json = schema_to_json::<EventTypeSchema>();
        assert!(json.contains("FRIEND"));
        let json = schema_to_json::<OperationSchema>();
        assert!(json.contains("REMOVE"));
    }
}
