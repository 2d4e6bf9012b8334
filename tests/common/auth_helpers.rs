//! Authentication test helpers
//!
//! Utilities for creating test users and tokens.

use sqlx::PgPool;
use uuid::Uuid;

use gatehouse::auth::sessions::create_token;
use gatehouse::auth::users::{create_user, User};

/// Test user credentials
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// A unique email so tests can run in parallel
pub fn unique_email(tag: &str) -> String {
    format!("{}_{}@example.com", tag, Uuid::new_v4().simple())
}

/// Create a credential-registered test user
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<TestUser, Box<dyn std::error::Error>> {
    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let user = create_user(pool, email, Some(&password_hash)).await?;
    let token = create_token(user.id, user.email.clone())?;

    Ok(TestUser {
        id: user.id,
        email: user.email,
        password: password.to_string(),
        token,
    })
}

/// Create a user the way a third-party sign-in would: no password hash
pub async fn create_oauth_only_user(
    pool: &PgPool,
    email: &str,
) -> Result<User, Box<dyn std::error::Error>> {
    Ok(create_user(pool, email, None).await?)
}
