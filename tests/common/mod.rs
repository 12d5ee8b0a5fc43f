#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use todo_api_rust::database::clock::{Clock, SystemClock};
use todo_api_rust::{app, database, AppState};

/// Fresh app over a fresh in-memory database. Returns the state too so
/// tests can inspect the store directly.
pub async fn test_state_with_clock(clock: Arc<dyn Clock>) -> (Router, AppState) {
    // One connection keeps the whole pool on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    database::init_schema(&pool).await.expect("schema init");

    let state = AppState::new(pool, clock);
    (app(state.clone()), state)
}

pub async fn test_state() -> (Router, AppState) {
    test_state_with_clock(Arc::new(SystemClock)).await
}

pub async fn test_app() -> Router {
    test_state().await.0
}

pub async fn test_app_with_clock(clock: Arc<dyn Clock>) -> Router {
    test_state_with_clock(clock).await.0
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("request")
}

pub fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn form_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Sign up a user through the API, returning the public view.
pub async fn create_user(app: &Router, username: &str, email: &str, password: &str) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/users/",
            None,
            &json!({ "username": username, "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Obtain a bearer token for existing credentials.
pub async fn token_for(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        form_request("/auth/token", format!("username={username}&password={password}")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .expect("access_token")
        .to_string()
}

/// Create a todo through the API, returning its view.
pub async fn create_todo(
    app: &Router,
    token: &str,
    title: &str,
    description: &str,
    state: &str,
) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/todos/",
            Some(token),
            &json!({ "title": title, "description": description, "state": state }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
