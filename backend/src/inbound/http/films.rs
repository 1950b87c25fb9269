//! Film HTTP handlers.
//!
//! ```text
//! GET    /films
//! POST   /films
//! PUT    /films
//! GET    /films/popular?count&genreId&year
//! GET    /films/common?userId&friendId
//! GET    /films/search?query&by=title
//! GET    /films/{id}
//! DELETE /films/{id}
//! PUT    /films/{id}/like/{userId}
//! DELETE /films/{id}/like/{userId}
//! GET    /users/{id}/recommendations
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DEFAULT_POPULAR_COUNT, Error, FilmDraft, FilmId, FilmSearch, GenreId, MAX_DESCRIPTION_CHARS,
    PopularFilmsQuery, RatingId, SearchField, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, FilmSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrors, FieldName, field_error};

const ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");
const DESCRIPTION: FieldName = FieldName::new("description");
const RELEASE_DATE: FieldName = FieldName::new("releaseDate");
const DURATION: FieldName = FieldName::new("duration");
const COUNT: FieldName = FieldName::new("count");
const BY: FieldName = FieldName::new("by");

/// Reference to a catalogue entry by identifier, e.g. `{"id": 3}`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct CatalogueRef {
    pub id: i64,
}

/// Request body for `POST /films` and `PUT /films`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilmRequest {
    /// Optional on create; required on update.
    pub id: Option<i64>,
    #[schema(example = "Alien")]
    pub name: Option<String>,
    /// At most 200 characters; defaults to empty.
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1979-05-25")]
    pub release_date: Option<NaiveDate>,
    /// Running time in minutes; must be positive.
    #[schema(example = 117)]
    pub duration: Option<i32>,
    pub mpa: Option<CatalogueRef>,
    pub genres: Option<Vec<CatalogueRef>>,
}

impl FilmRequest {
    fn into_draft(self, id_required: bool) -> Result<FilmDraft, Error> {
        let mut errors = FieldErrors::new();
        let id = if id_required {
            errors.require(ID, self.id)
        } else {
            self.id
        };
        let name = errors.require(NAME, self.name);
        let release_date = errors.require(RELEASE_DATE, self.release_date);
        let duration = errors.require(DURATION, self.duration);
        if duration.is_some_and(|minutes| minutes <= 0) {
            errors.add(DURATION, "must be positive");
        }
        let description = self.description.unwrap_or_default();
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            errors.add(
                DESCRIPTION,
                format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
            );
        }
        let mpa = self.mpa.map(|rating| RatingId::new(rating.id));
        let genres: Vec<GenreId> = self
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|genre| GenreId::new(genre.id))
            .collect();

        errors.finish(|| {
            Some(FilmDraft {
                id: id.map(FilmId::new),
                name: name?,
                description,
                release_date: release_date?,
                duration: duration?,
                mpa,
                genres,
            })
        })
    }
}

/// Query parameters for `GET /films/popular`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct PopularParams {
    /// How many films to return; defaults to 10.
    pub count: Option<usize>,
    pub genre_id: Option<i64>,
    pub year: Option<i32>,
}

impl PopularParams {
    fn into_query(self) -> Result<PopularFilmsQuery, Error> {
        let count = self.count.unwrap_or(DEFAULT_POPULAR_COUNT);
        if count == 0 {
            return Err(field_error(COUNT, "must be positive"));
        }
        Ok(PopularFilmsQuery {
            count,
            genre_id: self.genre_id.map(GenreId::new),
            year: self.year,
        })
    }
}

/// Query parameters for `GET /films/common`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct CommonFilmsParams {
    pub user_id: i64,
    pub friend_id: i64,
}

/// Query parameters for `GET /films/search`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive title fragment.
    pub query: String,
    /// Comma-separated fields to search; defaults to `title`.
    pub by: Option<String>,
}

impl SearchParams {
    fn into_search(self) -> Result<FilmSearch, Error> {
        let by = match self.by.as_deref() {
            None => vec![SearchField::Title],
            Some(fields) => fields
                .split(',')
                .map(str::parse::<SearchField>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| field_error(BY, err.to_string()))?,
        };
        Ok(FilmSearch {
            query: self.query,
            by,
        })
    }
}

/// List every film in identifier order.
#[utoipa::path(
    get,
    path = "/films",
    responses(
        (status = 200, description = "All films", body = [FilmSchema]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "listFilms"
)]
#[get("/films")]
pub async fn list_films(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let films = state.films_query.list_films().await?;
    Ok(HttpResponse::Ok().json(films))
}

/// Create a film.
#[utoipa::path(
    post,
    path = "/films",
    request_body = FilmRequest,
    responses(
        (status = 201, description = "Film created", body = FilmSchema),
        (status = 400, description = "Invalid film or duplicate id", body = ErrorSchema),
        (status = 404, description = "Unknown rating or genre", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "createFilm"
)]
#[post("/films")]
pub async fn create_film(
    state: web::Data<HttpState>,
    payload: web::Json<FilmRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft(false)?;
    let film = state.films.create_film(draft).await?;
    Ok(HttpResponse::Created().json(film))
}

/// Replace a film's attributes, keeping its likes.
#[utoipa::path(
    put,
    path = "/films",
    request_body = FilmRequest,
    responses(
        (status = 200, description = "Film updated", body = FilmSchema),
        (status = 400, description = "Invalid film", body = ErrorSchema),
        (status = 404, description = "Film, rating or genre not found", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "updateFilm"
)]
#[put("/films")]
pub async fn update_film(
    state: web::Data<HttpState>,
    payload: web::Json<FilmRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft(true)?;
    let film = state.films.update_film(draft).await?;
    Ok(HttpResponse::Ok().json(film))
}

/// Most-liked films, optionally filtered by genre and release year.
#[utoipa::path(
    get,
    path = "/films/popular",
    params(PopularParams),
    responses(
        (status = 200, description = "Films ranked by likes", body = [FilmSchema]),
        (status = 400, description = "Invalid parameters", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "popularFilms"
)]
#[get("/films/popular")]
pub async fn popular_films(
    state: web::Data<HttpState>,
    params: web::Query<PopularParams>,
) -> ApiResult<HttpResponse> {
    let query = params.into_inner().into_query()?;
    let films = state.films_query.most_popular(query).await?;
    Ok(HttpResponse::Ok().json(films))
}

/// Films liked by both users.
#[utoipa::path(
    get,
    path = "/films/common",
    params(CommonFilmsParams),
    responses(
        (status = 200, description = "Shared likes, most popular first", body = [FilmSchema]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "commonFilms"
)]
#[get("/films/common")]
pub async fn common_films(
    state: web::Data<HttpState>,
    params: web::Query<CommonFilmsParams>,
) -> ApiResult<HttpResponse> {
    let CommonFilmsParams { user_id, friend_id } = params.into_inner();
    let films = state
        .films_query
        .common_films(UserId::new(user_id), UserId::new(friend_id))
        .await?;
    Ok(HttpResponse::Ok().json(films))
}

/// Films whose title contains the query.
#[utoipa::path(
    get,
    path = "/films/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching films, most popular first", body = [FilmSchema]),
        (status = 400, description = "Unknown search field", body = ErrorSchema),
        (status = 501, description = "Search by director", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "searchFilms"
)]
#[get("/films/search")]
pub async fn search_films(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let search = params.into_inner().into_search()?;
    let films = state.films_query.search_films(search).await?;
    Ok(HttpResponse::Ok().json(films))
}

/// Fetch one film.
#[utoipa::path(
    get,
    path = "/films/{id}",
    params(("id" = i64, Path, description = "Film identifier")),
    responses(
        (status = 200, description = "Film", body = FilmSchema),
        (status = 404, description = "Film not found", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "getFilm"
)]
#[get("/films/{id}")]
pub async fn get_film(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let film = state.films_query.get_film(FilmId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(film))
}

/// Delete a film with its likes and reviews.
#[utoipa::path(
    delete,
    path = "/films/{id}",
    params(("id" = i64, Path, description = "Film identifier")),
    responses(
        (status = 200, description = "Film deleted"),
        (status = 404, description = "Film not found", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "deleteFilm"
)]
#[delete("/films/{id}")]
pub async fn delete_film(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.films.delete_film(FilmId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Record that a user likes a film.
#[utoipa::path(
    put,
    path = "/films/{id}/like/{userId}",
    params(
        ("id" = i64, Path, description = "Film identifier"),
        ("userId" = i64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Like recorded"),
        (status = 404, description = "Film or user not found", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "addLike"
)]
#[put("/films/{id}/like/{user_id}")]
pub async fn add_like(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (film_id, user_id) = path.into_inner();
    state
        .films
        .add_like(FilmId::new(film_id), UserId::new(user_id))
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Withdraw a like; absent likes are ignored.
#[utoipa::path(
    delete,
    path = "/films/{id}/like/{userId}",
    params(
        ("id" = i64, Path, description = "Film identifier"),
        ("userId" = i64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Like removed"),
        (status = 404, description = "Film or user not found", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "removeLike"
)]
#[delete("/films/{id}/like/{user_id}")]
pub async fn remove_like(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (film_id, user_id) = path.into_inner();
    state
        .films
        .remove_like(FilmId::new(film_id), UserId::new(user_id))
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Films liked by the most similar user that this user has not liked.
#[utoipa::path(
    get,
    path = "/users/{id}/recommendations",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Recommended films", body = [FilmSchema]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["films"],
    operation_id = "recommendations"
)]
#[get("/users/{id}/recommendations")]
pub async fn recommendations(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let films = state
        .films_query
        .recommendations(UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(films))
}

#[cfg(test)]
#[path = "films_tests.rs"]
mod tests;
