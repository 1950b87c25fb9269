//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], which
//! describe domain types without coupling them to utoipa.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::films::{CatalogueRef, FilmRequest};
use crate::inbound::http::reviews::{ReviewRequest, ReviewUpdateRequest};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, EventTypeSchema, FeedEventSchema, FilmSchema, GenreSchema,
    OperationSchema, RatingSchema, ReviewSchema, UserSchema,
};
use crate::inbound::http::users::UserRequest;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cinegraph API",
        description = "Film catalogue with likes, friendships, reviews and activity feeds.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::films::list_films,
        crate::inbound::http::films::create_film,
        crate::inbound::http::films::update_film,
        crate::inbound::http::films::popular_films,
        crate::inbound::http::films::common_films,
        crate::inbound::http::films::search_films,
        crate::inbound::http::films::get_film,
        crate::inbound::http::films::delete_film,
        crate::inbound::http::films::add_like,
        crate::inbound::http::films::remove_like,
        crate::inbound::http::films::recommendations,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::list_friends,
        crate::inbound::http::users::common_friends,
        crate::inbound::http::users::add_friend,
        crate::inbound::http::users::remove_friend,
        crate::inbound::http::users::feed,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::get_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::reviews::add_useful_vote,
        crate::inbound::http::reviews::remove_useful_vote,
        crate::inbound::http::reviews::add_not_useful_vote,
        crate::inbound::http::reviews::remove_not_useful_vote,
        crate::inbound::http::catalogue::list_genres,
        crate::inbound::http::catalogue::get_genre,
        crate::inbound::http::catalogue::list_ratings,
        crate::inbound::http::catalogue::get_rating,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        FilmSchema,
        UserSchema,
        ReviewSchema,
        FeedEventSchema,
        EventTypeSchema,
        OperationSchema,
        RatingSchema,
        GenreSchema,
        FilmRequest,
        CatalogueRef,
        UserRequest,
        ReviewRequest,
        ReviewUpdateRequest,
    )),
    tags(
        (name = "films", description = "Films, likes and rankings"),
        (name = "users", description = "Users, friendships and feeds"),
        (name = "reviews", description = "Reviews and usefulness votes"),
        (name = "catalogue", description = "MPA ratings and genres"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's shape.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const FILM_SCHEMA_NAME: &str = "crate.domain.Film";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");
        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "error");
        assert_object_schema_has_field(error, "traceId");
    }

    #[rstest]
    fn film_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let film = schemas.get(FILM_SCHEMA_NAME).expect("Film schema");
        assert_object_schema_has_field(film, "releaseDate");
        assert_object_schema_has_field(film, "likes");
    }

    #[rstest]
    #[case("/films")]
    #[case("/films/popular")]
    #[case("/films/{id}/like/{userId}")]
    #[case("/users/{id}/friends/common/{otherId}")]
    #[case("/users/{id}/feed")]
    #[case("/reviews/{id}/dislike/{userId}")]
    #[case("/mpa/{id}")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
