use std::sync::Arc;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;

use crate::database::clock::Clock;
use crate::database::models::{Todo, TodoState};
use crate::AppState;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Task not found.")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Optional list filters; absent fields do not constrain the query.
#[derive(Debug, Default)]
pub struct TodoFilters {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
}

/// Fields supplied in a PATCH body. `None` leaves the stored value as is.
#[derive(Debug, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
}

/// Create/read/update/delete for todos, always scoped to one owner.
/// Lookups key on `(id, user_id)`, so another user's todo behaves exactly
/// like a missing one.
pub struct TodoRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl TodoRepository {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            clock: state.clock.clone(),
        }
    }

    pub async fn create(
        &self,
        owner_id: i64,
        title: &str,
        description: &str,
        state: TodoState,
    ) -> Result<Todo, TodoError> {
        let now = self.clock.now();
        let todo = sqlx::query_as(
            "INSERT INTO todos (title, description, state, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(state)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    /// Filtered, paginated listing of the owner's todos in insertion order.
    /// Title and description match by case-sensitive substring (instr();
    /// LIKE would be case-insensitive for ASCII), state by exact value, and
    /// supplied filters combine with AND.
    pub async fn list(
        &self,
        owner_id: i64,
        filters: &TodoFilters,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Todo>, TodoError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM todos WHERE user_id = ");
        query.push_bind(owner_id);

        if let Some(title) = &filters.title {
            query.push(" AND instr(title, ");
            query.push_bind(title);
            query.push(") > 0");
        }
        if let Some(description) = &filters.description {
            query.push(" AND instr(description, ");
            query.push_bind(description);
            query.push(") > 0");
        }
        if let Some(state) = filters.state {
            query.push(" AND state = ");
            query.push_bind(state);
        }

        query.push(" ORDER BY id LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let todos = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(todos)
    }

    /// Apply only the supplied fields, leaving the rest untouched.
    pub async fn patch(&self, owner_id: i64, id: i64, patch: TodoPatch) -> Result<Todo, TodoError> {
        let mut tx = self.pool.begin().await?;

        let todo: Todo = sqlx::query_as("SELECT * FROM todos WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(TodoError::NotFound)?;

        let title = patch.title.unwrap_or(todo.title);
        let description = patch.description.unwrap_or(todo.description);
        let state = patch.state.unwrap_or(todo.state);
        let now = self.clock.now();

        let updated: Todo = sqlx::query_as(
            "UPDATE todos
             SET title = ?1, description = ?2, state = ?3, updated_at = ?4
             WHERE id = ?5
             RETURNING *",
        )
        .bind(&title)
        .bind(&description)
        .bind(state)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, owner_id: i64, id: i64) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }
        Ok(())
    }
}
