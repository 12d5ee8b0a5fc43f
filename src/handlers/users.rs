use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::Message;
use crate::config;
use crate::database::models::User;
use crate::database::users::UserRepository;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserSchema {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The subset of a user safe to return to clients. Never carries the
/// password hash.
#[derive(Debug, Serialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserPublic>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// POST /users/ - sign up (public)
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserSchema>,
) -> Result<(StatusCode, Json<UserPublic>), ApiError> {
    let user = UserRepository::new(&state)
        .create(&payload.username, &payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/ - list all users (public, unscoped)
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<UserList>, ApiError> {
    let offset = page.offset.unwrap_or(0);
    let limit = page.limit.unwrap_or(config::config().api.default_page_limit);

    let users = UserRepository::new(&state).list(offset, limit).await?;
    Ok(Json(UserList {
        users: users.into_iter().map(UserPublic::from).collect(),
    }))
}

/// GET /users/:id - single user (public)
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserPublic>, ApiError> {
    let user = UserRepository::new(&state).get(id).await?;
    Ok(Json(user.into()))
}

/// PUT /users/:id - replace own account (bearer)
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserSchema>,
) -> Result<Json<UserPublic>, ApiError> {
    let user = UserRepository::new(&state)
        .update(id, &caller, &payload.username, &payload.email, &payload.password)
        .await?;
    Ok(Json(user.into()))
}

/// DELETE /users/:id - remove own account (bearer)
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    UserRepository::new(&state).delete(id, &caller).await?;
    Ok(Json(Message::new("User deleted")))
}
