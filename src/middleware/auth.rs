use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::auth;
use crate::database::users::UserRepository;
use crate::error::ApiError;
use crate::AppState;

/// Authenticated principal for the current request, resolved from the
/// bearer token. Handlers that take this extractor are bearer-protected.
#[derive(Debug)]
pub struct CurrentUser(pub crate::database::models::User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let subject = auth::decode_access_token(&token)?;

        // A valid token whose subject no longer exists is treated the same
        // as a bad token
        let user = UserRepository::new(state)
            .find_by_username(&subject)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        Ok(CurrentUser(user))
    }
}

/// Extract the token from the Authorization header. A missing header is
/// "not authenticated"; anything present but unusable is an invalid
/// credential.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::NotAuthenticated)?;

    let auth_str = auth_header.to_str().map_err(|_| ApiError::InvalidCredentials)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(ApiError::InvalidCredentials)?;

    if token.trim().is_empty() {
        return Err(ApiError::InvalidCredentials);
    }
    Ok(token.to_string())
}
