use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;
use crate::config;
use crate::database::models::{Todo, TodoState};
use crate::database::todos::{TodoFilters, TodoPatch, TodoRepository};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TodoSchema {
    pub title: String,
    pub description: String,
    pub state: TodoState,
}

#[derive(Debug, Serialize)]
pub struct TodoPublic {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub state: TodoState,
}

impl From<Todo> for TodoPublic {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            state: todo.state,
        }
    }
}

/// List variant of the todo view, with store-assigned timestamps.
#[derive(Debug, Serialize)]
pub struct TodoDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub state: TodoState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoDetail {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            state: todo.state,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoList {
    pub todos: Vec<TodoDetail>,
}

#[derive(Debug, Deserialize)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
}

#[derive(Debug, Deserialize)]
pub struct TodoFilterQuery {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// POST /todos/ - create a todo owned by the caller
pub async fn create_todo(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<TodoSchema>,
) -> Result<Json<TodoPublic>, ApiError> {
    let todo = TodoRepository::new(&state)
        .create(caller.id, &payload.title, &payload.description, payload.state)
        .await?;
    Ok(Json(todo.into()))
}

/// GET /todos/ - filtered, paginated listing of the caller's todos
pub async fn list_todos(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<TodoFilterQuery>,
) -> Result<Json<TodoList>, ApiError> {
    let filters = TodoFilters {
        title: query.title,
        description: query.description,
        state: query.state,
    };
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(config::config().api.default_page_limit);

    let todos = TodoRepository::new(&state)
        .list(caller.id, &filters, offset, limit)
        .await?;
    Ok(Json(TodoList {
        todos: todos.into_iter().map(TodoDetail::from).collect(),
    }))
}

/// PATCH /todos/:id - partial update of an owned todo
pub async fn patch_todo(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TodoUpdate>,
) -> Result<Json<TodoPublic>, ApiError> {
    let patch = TodoPatch {
        title: payload.title,
        description: payload.description,
        state: payload.state,
    };
    let todo = TodoRepository::new(&state).patch(caller.id, id, patch).await?;
    Ok(Json(todo.into()))
}

/// DELETE /todos/:id - remove an owned todo
pub async fn delete_todo(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    TodoRepository::new(&state).delete(caller.id, id).await?;
    Ok(Json(Message::new("Task has been deleted successfully.")))
}
