//! Read-only rating and genre catalogue endpoints.
//!
//! ```text
//! GET /genres
//! GET /genres/{id}
//! GET /mpa
//! GET /mpa/{id}
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::{GenreId, RatingId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, GenreSchema, RatingSchema};
use crate::inbound::http::state::HttpState;

/// All genres in identifier order.
#[utoipa::path(
    get,
    path = "/genres",
    responses((status = 200, description = "Genres", body = [GenreSchema])),
    tags = ["catalogue"],
    operation_id = "listGenres"
)]
#[get("/genres")]
pub async fn list_genres(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let genres = state.catalogue.list_genres().await?;
    Ok(HttpResponse::Ok().json(genres))
}

/// One genre.
#[utoipa::path(
    get,
    path = "/genres/{id}",
    params(("id" = i64, Path, description = "Genre identifier")),
    responses(
        (status = 200, description = "Genre", body = GenreSchema),
        (status = 404, description = "Genre not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getGenre"
)]
#[get("/genres/{id}")]
pub async fn get_genre(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let genre = state.catalogue.get_genre(GenreId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(genre))
}

/// All MPA ratings in identifier order.
#[utoipa::path(
    get,
    path = "/mpa",
    responses((status = 200, description = "Ratings", body = [RatingSchema])),
    tags = ["catalogue"],
    operation_id = "listRatings"
)]
#[get("/mpa")]
pub async fn list_ratings(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let ratings = state.catalogue.list_ratings().await?;
    Ok(HttpResponse::Ok().json(ratings))
}

/// One MPA rating.
#[utoipa::path(
    get,
    path = "/mpa/{id}",
    params(("id" = i64, Path, description = "Rating identifier")),
    responses(
        (status = 200, description = "Rating", body = RatingSchema),
        (status = 404, description = "Rating not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getRating"
)]
#[get("/mpa/{id}")]
pub async fn get_rating(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let rating = state
        .catalogue
        .get_rating(RatingId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(rating))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{Error, seed_genres, seed_ratings};
    use crate::inbound::http::test_utils::{MockPorts, send};

    #[rstest]
    #[actix_web::test]
    async fn genres_are_listed() {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_list_genres()
            .return_once(|| Ok(seed_genres()));

        let res = send(ports, TestRequest::get().uri("/genres")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0], json!({"id": 1, "name": "Comedy"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn rating_lookup_uses_path_id() {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_get_rating()
            .withf(|id| *id == RatingId::new(3))
            .return_once(|id| {
                seed_ratings()
                    .into_iter()
                    .find(|rating| rating.id == id)
                    .ok_or_else(|| Error::not_found("rating not found"))
            });

        let res = send(ports, TestRequest::get().uri("/mpa/3")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["id"], 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_genre_is_404() {
        let mut ports = MockPorts::default();
        ports
            .catalogue
            .expect_get_genre()
            .return_once(|id| Err(Error::not_found(format!("genre {id} not found"))));

        let res = send(ports, TestRequest::get().uri("/genres/99")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
