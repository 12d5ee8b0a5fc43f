use axum::{extract::State, Form, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::config;
use crate::database::users::UserRepository;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

/// OAuth2 password-grant style form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

fn issue_for(username: &str) -> Result<Token, ApiError> {
    let ttl = Duration::minutes(config::config().security.access_token_expire_minutes);
    let token = auth::create_access_token(username, ttl)
        .map_err(|e| ApiError::Internal(format!("token generation failed: {e}")))?;
    Ok(Token::bearer(token))
}

/// POST /auth/token - exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Token>, ApiError> {
    let user = UserRepository::new(&state)
        .find_by_username(&form.username)
        .await?
        .filter(|user| auth::verify_password(&form.password, &user.password_hash))
        .ok_or(ApiError::InvalidLogin)?;

    Ok(Json(issue_for(&user.username)?))
}

/// POST /auth/refresh_token - fresh token for an authenticated caller
pub async fn refresh_token(CurrentUser(user): CurrentUser) -> Result<Json<Token>, ApiError> {
    Ok(Json(issue_for(&user.username)?))
}
