// HTTP API Error Types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;
use thiserror::Error;

use crate::auth::TokenError;
use crate::database::todos::TodoError;
use crate::database::users::UserError;

/// HTTP API error with appropriate status codes and client-friendly messages.
/// Every failure serializes as `{"detail": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request (field-specific uniqueness failures on signup)
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Could not validate credentials")]
    InvalidCredentials,
    #[error("Incorrect username or password")]
    InvalidLogin,

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // 500 Internal Server Error
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated
            | ApiError::InvalidCredentials
            | ApiError::InvalidLogin => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message. Storage faults are logged, never exposed.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::UsernameExists | UserError::EmailExists => ApiError::BadRequest(message),
            UserError::Conflict => ApiError::Conflict(message),
            UserError::NotFound => ApiError::NotFound(message),
            UserError::NotOwner => ApiError::Forbidden(message),
            UserError::Database(e) => ApiError::Database(e),
            UserError::Hash(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound => ApiError::NotFound(err.to_string()),
            TodoError::Database(e) => ApiError::Database(e),
        }
    }
}

// All token failures look the same to the client; the variant only matters
// for logging.
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::debug!("rejected bearer token: {err}");
        ApiError::InvalidCredentials
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::Database(e) => tracing::error!("database error: {e}"),
            ApiError::Internal(msg) => tracing::error!("internal error: {msg}"),
            _ => {}
        }

        let status = self.status_code();
        let mut response = (status, Json(json!({ "detail": self.detail() }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
