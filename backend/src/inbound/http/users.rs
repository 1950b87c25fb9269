//! User, friendship and feed HTTP handlers.
//!
//! ```text
//! GET    /users
//! POST   /users
//! PUT    /users
//! GET    /users/{id}
//! DELETE /users/{id}
//! GET    /users/{id}/friends
//! GET    /users/{id}/friends/common/{otherId}
//! PUT    /users/{id}/friends/{friendId}
//! DELETE /users/{id}/friends/{friendId}
//! GET    /users/{id}/feed
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UserDraft, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, FeedEventSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrors, FieldName, looks_like_email};

const ID: FieldName = FieldName::new("id");
const EMAIL: FieldName = FieldName::new("email");
const LOGIN: FieldName = FieldName::new("login");

/// Request body for `POST /users` and `PUT /users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Optional on create; required on update.
    pub id: Option<i64>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "ada")]
    pub login: Option<String>,
    /// Defaults to the login when absent or blank.
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "1990-12-10")]
    pub birthday: Option<NaiveDate>,
}

impl UserRequest {
    fn into_draft(self, id_required: bool) -> Result<UserDraft, Error> {
        let mut errors = FieldErrors::new();
        let id = if id_required {
            errors.require(ID, self.id)
        } else {
            self.id
        };
        let email = errors.require(EMAIL, self.email);
        if email.as_deref().is_some_and(|email| !looks_like_email(email)) {
            errors.add(EMAIL, "must be a valid email address");
        }
        let login = errors.require(LOGIN, self.login);
        let name = self.name;
        let birthday = self.birthday;

        errors.finish(|| {
            Some(UserDraft {
                id: id.map(UserId::new),
                email: email?,
                login: login?,
                name,
                birthday,
            })
        })
    }
}

/// List every user in identifier order.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserSchema]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users_query.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Invalid user or email taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft(false)?;
    let user = state.users.create_user(draft).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Replace a user's profile, keeping friendships.
#[utoipa::path(
    put,
    path = "/users",
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserSchema),
        (status = 400, description = "Invalid user or email taken", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users")]
pub async fn update_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft(true)?;
    let user = state.users.update_user(draft).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user = state.users_query.get_user(UserId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user with their likes, friendships and reviews.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.users.delete_user(UserId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Users this user has befriended.
#[utoipa::path(
    get,
    path = "/users/{id}/friends",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Friends in identifier order", body = [UserSchema]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listFriends"
)]
#[get("/users/{id}/friends")]
pub async fn list_friends(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let friends = state.users_query.friends(UserId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(friends))
}

/// Users befriended by both users.
#[utoipa::path(
    get,
    path = "/users/{id}/friends/common/{otherId}",
    params(
        ("id" = i64, Path, description = "User identifier"),
        ("otherId" = i64, Path, description = "Other user identifier")
    ),
    responses(
        (status = 200, description = "Common friends", body = [UserSchema]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "commonFriends"
)]
#[get("/users/{id}/friends/common/{other_id}")]
pub async fn common_friends(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (user_id, other_id) = path.into_inner();
    let friends = state
        .users_query
        .common_friends(UserId::new(user_id), UserId::new(other_id))
        .await?;
    Ok(HttpResponse::Ok().json(friends))
}

/// Add a one-directional friendship.
#[utoipa::path(
    put,
    path = "/users/{id}/friends/{friendId}",
    params(
        ("id" = i64, Path, description = "User identifier"),
        ("friendId" = i64, Path, description = "Friend identifier")
    ),
    responses(
        (status = 200, description = "Friend added"),
        (status = 400, description = "User cannot befriend themselves", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "addFriend"
)]
#[put("/users/{id}/friends/{friend_id}")]
pub async fn add_friend(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (user_id, friend_id) = path.into_inner();
    state
        .users
        .add_friend(UserId::new(user_id), UserId::new(friend_id))
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Remove a friendship; absent friendships are ignored.
#[utoipa::path(
    delete,
    path = "/users/{id}/friends/{friendId}",
    params(
        ("id" = i64, Path, description = "User identifier"),
        ("friendId" = i64, Path, description = "Friend identifier")
    ),
    responses(
        (status = 200, description = "Friend removed"),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "removeFriend"
)]
#[delete("/users/{id}/friends/{friend_id}")]
pub async fn remove_friend(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (user_id, friend_id) = path.into_inner();
    state
        .users
        .remove_friend(UserId::new(user_id), UserId::new(friend_id))
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// The user's activity feed, oldest first.
#[utoipa::path(
    get,
    path = "/users/{id}/feed",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Feed events", body = [FeedEventSchema]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "userFeed"
)]
#[get("/users/{id}/feed")]
pub async fn feed(state: web::Data<HttpState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let events = state.users_query.feed(UserId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(events))
}
