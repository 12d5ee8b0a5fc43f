use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A user row. The password hash never leaves the server; client-facing
/// views are built in the handler layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
