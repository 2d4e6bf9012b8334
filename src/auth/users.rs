/**
 * User Model and Database Operations
 *
 * This module handles user records and the database operations on them.
 * A user is keyed by email; the password hash is optional because accounts
 * provisioned through a third-party sign-in never get one.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// User email address (unique, exact-match key)
    pub email: String,
    /// Hashed password (bcrypt); `None` for accounts created by a
    /// third-party sign-in
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this account can attempt a password sign-in at all
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email
/// * `password_hash` - Hashed password, or `None` for externally
///   authenticated accounts
///
/// # Returns
/// Created user or error. A unique-constraint violation on `email` is
/// returned as-is so callers can map it to a conflict.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: Option<&str>,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - User ID
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
