use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::auth;
use crate::database::clock::Clock;
use crate::database::models::User;
use crate::AppState;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username already exists")]
    UsernameExists,
    #[error("Email already exists")]
    EmailExists,
    #[error("Username or Email already exists")]
    Conflict,
    #[error("User not found")]
    NotFound,
    #[error("Not enough permissions")]
    NotOwner,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Create/read/update/delete for user records.
///
/// Uniqueness of username and email is enforced twice: a pre-check inside
/// the transaction picks the client-facing message, and the store's unique
/// indexes catch any race at commit time.
pub struct UserRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl UserRepository {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            clock: state.clock.clone(),
        }
    }

    /// Sign up a new user. Username collisions are reported before email
    /// collisions when both would conflict.
    pub async fn create(&self, username: &str, email: &str, password: &str) -> Result<User, UserError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<User> =
            sqlx::query_as("SELECT * FROM users WHERE username = ?1 OR email = ?2 LIMIT 1")
                .bind(username)
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;

        if let Some(existing) = existing {
            return Err(if existing.username == username {
                UserError::UsernameExists
            } else {
                UserError::EmailExists
            });
        }

        let password_hash = auth::hash_password(password).map_err(|e| UserError::Hash(e.to_string()))?;
        let now = self.clock.now();

        let user: User = sqlx::query_as(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING *",
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(Self::map_create_violation)?;

        tx.commit().await?;
        Ok(user)
    }

    /// A signup that lost the race against a concurrent insert still gets
    /// the field-specific message; the violated index names the column.
    fn map_create_violation(err: sqlx::Error) -> UserError {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return if db.message().contains("users.username") {
                    UserError::UsernameExists
                } else {
                    UserError::EmailExists
                };
            }
        }
        UserError::Database(err)
    }

    /// All users, in insertion order, windowed by offset/limit.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, UserError> {
        let users = sqlx::query_as("SELECT * FROM users ORDER BY id LIMIT ?1 OFFSET ?2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get(&self, id: i64) -> Result<User, UserError> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::NotFound)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    /// Replace a user's credentials. Only the owner may do this; the
    /// ownership check comes first, so a foreign (or nonexistent) id is
    /// always a permission failure, never a 404 or a conflict.
    pub async fn update(
        &self,
        id: i64,
        caller: &User,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        if caller.id != id {
            return Err(UserError::NotOwner);
        }

        let password_hash = auth::hash_password(password).map_err(|e| UserError::Hash(e.to_string()))?;
        let now = self.clock.now();

        let mut tx = self.pool.begin().await?;
        let updated: User = sqlx::query_as(
            "UPDATE users
             SET username = ?1, email = ?2, password_hash = ?3, updated_at = ?4
             WHERE id = ?5
             RETURNING *",
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UserError::Conflict
            } else {
                UserError::Database(e)
            }
        })?;
        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64, caller: &User) -> Result<(), UserError> {
        if caller.id != id {
            return Err(UserError::NotOwner);
        }

        // FK cascade removes the user's todos
        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
