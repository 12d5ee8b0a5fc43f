pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use database::clock::Clock;

/// Shared request context: the connection pool and the time source used for
/// store-assigned timestamps.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(todo_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/token", post(auth::login))
        .route("/auth/refresh_token", post(auth::refresh_token))
}

// Collection routes are registered with and without the trailing slash;
// clients use both forms and axum matches paths exactly.
fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/", post(users::create_user).get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

fn todo_routes() -> Router<AppState> {
    use handlers::todos;

    Router::new()
        .route("/todos", post(todos::create_todo).get(todos::list_todos))
        .route("/todos/", post(todos::create_todo).get(todos::list_todos))
        .route(
            "/todos/:id",
            patch(todos::patch_todo).delete(todos::delete_todo),
        )
}
