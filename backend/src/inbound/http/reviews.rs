//! Review and review-vote HTTP handlers.
//!
//! ```text
//! GET    /reviews?filmId&count
//! POST   /reviews
//! PUT    /reviews
//! GET    /reviews/{id}
//! DELETE /reviews/{id}
//! PUT    /reviews/{id}/like/{userId}
//! DELETE /reviews/{id}/like/{userId}
//! PUT    /reviews/{id}/dislike/{userId}
//! DELETE /reviews/{id}/dislike/{userId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DEFAULT_REVIEW_COUNT, Error, FilmId, ReviewDraft, ReviewId, ReviewListQuery, ReviewUpdate,
    ReviewVote, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ReviewSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrors, FieldName, field_error};

const REVIEW_ID: FieldName = FieldName::new("reviewId");
const CONTENT: FieldName = FieldName::new("content");
const IS_POSITIVE: FieldName = FieldName::new("isPositive");
const USER_ID: FieldName = FieldName::new("userId");
const FILM_ID: FieldName = FieldName::new("filmId");
const COUNT: FieldName = FieldName::new("count");

/// Request body for `POST /reviews`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub review_id: Option<i64>,
    #[schema(example = "Still terrifying.")]
    pub content: Option<String>,
    pub is_positive: Option<bool>,
    pub user_id: Option<i64>,
    pub film_id: Option<i64>,
}

impl ReviewRequest {
    fn into_draft(self) -> Result<ReviewDraft, Error> {
        let mut errors = FieldErrors::new();
        let content = errors.require(CONTENT, self.content);
        let is_positive = errors.require(IS_POSITIVE, self.is_positive);
        let user_id = errors.require(USER_ID, self.user_id);
        let film_id = errors.require(FILM_ID, self.film_id);
        let id = self.review_id.map(ReviewId::new);

        errors.finish(|| {
            Some(ReviewDraft {
                id,
                film_id: FilmId::new(film_id?),
                user_id: UserId::new(user_id?),
                content: content?,
                is_positive: is_positive?,
            })
        })
    }
}

/// Request body for `PUT /reviews`; author and film cannot change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdateRequest {
    pub review_id: Option<i64>,
    pub content: Option<String>,
    pub is_positive: Option<bool>,
}

impl ReviewUpdateRequest {
    fn into_update(self) -> Result<ReviewUpdate, Error> {
        let mut errors = FieldErrors::new();
        let id = errors.require(REVIEW_ID, self.review_id);
        let content = errors.require(CONTENT, self.content);
        let is_positive = errors.require(IS_POSITIVE, self.is_positive);

        errors.finish(|| {
            Some(ReviewUpdate {
                id: ReviewId::new(id?),
                content: content?,
                is_positive: is_positive?,
            })
        })
    }
}

/// Query parameters for `GET /reviews`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ReviewListParams {
    /// Restrict to one film; all films when absent.
    pub film_id: Option<i64>,
    /// How many reviews to return; defaults to 10.
    pub count: Option<usize>,
}

impl ReviewListParams {
    fn into_query(self) -> Result<ReviewListQuery, Error> {
        let count = self.count.unwrap_or(DEFAULT_REVIEW_COUNT);
        if count == 0 {
            return Err(field_error(COUNT, "must be positive"));
        }
        Ok(ReviewListQuery {
            film_id: self.film_id.map(FilmId::new),
            count,
        })
    }
}

/// Most useful reviews first.
#[utoipa::path(
    get,
    path = "/reviews",
    params(ReviewListParams),
    responses(
        (status = 200, description = "Reviews by usefulness", body = [ReviewSchema]),
        (status = 400, description = "Invalid parameters", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews"
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    params: web::Query<ReviewListParams>,
) -> ApiResult<HttpResponse> {
    let query = params.into_inner().into_query()?;
    let reviews = state.reviews_query.list_reviews(query).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// Post a review.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewSchema),
        (status = 400, description = "Invalid review", body = ErrorSchema),
        (status = 404, description = "Film or user not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let review = state.reviews.create_review(draft).await?;
    Ok(HttpResponse::Created().json(review))
}

/// Edit a review's content and polarity.
#[utoipa::path(
    put,
    path = "/reviews",
    request_body = ReviewUpdateRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewSchema),
        (status = 400, description = "Invalid review", body = ErrorSchema),
        (status = 404, description = "Review not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[put("/reviews")]
pub async fn update_review(
    state: web::Data<HttpState>,
    payload: web::Json<ReviewUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let update = payload.into_inner().into_update()?;
    let review = state.reviews.update_review(update).await?;
    Ok(HttpResponse::Ok().json(review))
}

/// Fetch one review.
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(("id" = i64, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review", body = ReviewSchema),
        (status = 404, description = "Review not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "getReview"
)]
#[get("/reviews/{id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let review = state
        .reviews_query
        .get_review(ReviewId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

/// Delete a review and its votes.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = i64, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .reviews
        .delete_review(ReviewId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().finish())
}

async fn cast(state: &HttpState, ids: (i64, i64), vote: ReviewVote) -> ApiResult<HttpResponse> {
    let (review_id, user_id) = ids;
    state
        .reviews
        .add_vote(ReviewId::new(review_id), UserId::new(user_id), vote)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

async fn retract(state: &HttpState, ids: (i64, i64), vote: ReviewVote) -> ApiResult<HttpResponse> {
    let (review_id, user_id) = ids;
    state
        .reviews
        .remove_vote(ReviewId::new(review_id), UserId::new(user_id), vote)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Mark a review useful, replacing a not-useful vote by the same user.
#[utoipa::path(
    put,
    path = "/reviews/{id}/like/{userId}",
    params(
        ("id" = i64, Path, description = "Review identifier"),
        ("userId" = i64, Path, description = "Voting user identifier")
    ),
    responses(
        (status = 200, description = "Vote recorded"),
        (status = 404, description = "Review or user not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "addUsefulVote"
)]
#[put("/reviews/{id}/like/{user_id}")]
pub async fn add_useful_vote(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    cast(&state, path.into_inner(), ReviewVote::Useful).await
}

/// Withdraw a useful vote.
#[utoipa::path(
    delete,
    path = "/reviews/{id}/like/{userId}",
    params(
        ("id" = i64, Path, description = "Review identifier"),
        ("userId" = i64, Path, description = "Voting user identifier")
    ),
    responses(
        (status = 200, description = "Vote removed"),
        (status = 404, description = "Review or user not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "removeUsefulVote"
)]
#[delete("/reviews/{id}/like/{user_id}")]
pub async fn remove_useful_vote(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    retract(&state, path.into_inner(), ReviewVote::Useful).await
}

/// Mark a review not useful, replacing a useful vote by the same user.
#[utoipa::path(
    put,
    path = "/reviews/{id}/dislike/{userId}",
    params(
        ("id" = i64, Path, description = "Review identifier"),
        ("userId" = i64, Path, description = "Voting user identifier")
    ),
    responses(
        (status = 200, description = "Vote recorded"),
        (status = 404, description = "Review or user not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "addNotUsefulVote"
)]
#[put("/reviews/{id}/dislike/{user_id}")]
pub async fn add_not_useful_vote(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    cast(&state, path.into_inner(), ReviewVote::NotUseful).await
}

/// Withdraw a not-useful vote.
#[utoipa::path(
    delete,
    path = "/reviews/{id}/dislike/{userId}",
    params(
        ("id" = i64, Path, description = "Review identifier"),
        ("userId" = i64, Path, description = "Voting user identifier")
    ),
    responses(
        (status = 200, description = "Vote removed"),
        (status = 404, description = "Review or user not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "removeNotUsefulVote"
)]
#[delete("/reviews/{id}/dislike/{user_id}")]
pub async fn remove_not_useful_vote(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    retract(&state, path.into_inner(), ReviewVote::NotUseful).await
}
