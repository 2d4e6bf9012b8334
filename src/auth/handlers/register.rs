/**
 * Registration Handler
 *
 * This module implements the user registration handler for
 * POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate email shape and password length
 * 2. Check if a user with this email already exists
 * 3. Hash the password using bcrypt
 * 4. Create the user in the database
 *
 * # Validation
 *
 * The checks are input hygiene, not security boundaries; the pages repeat
 * them client-side for faster feedback.
 *
 * - Email must have the local-part@domain shape
 * - Password must be at least 8 characters long
 * - Email must be unique (enforced again by the store's constraint)
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::{RegisterRequest, UserResponse};
use crate::auth::users::{create_user, get_user_by_email};
use crate::error::AuthError;

/// Validate email shape
///
/// Accepts `local@domain.tld`: a non-empty local part, a domain with at
/// least one dot, non-empty alphanumeric-or-hyphen labels, and an
/// alphabetic final label of two or more characters.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if !labels.iter().all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }) {
        return false;
    }

    // Final label is the TLD: two or more letters
    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Registration handler
///
/// Validates the input, creates the user account, and returns the public
/// user representation. Registration does not sign the user in; the page
/// sends them to the login form.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Registration request containing email and password
///
/// # Returns
///
/// `201 Created` with the user info, or an error response
///
/// # Errors
///
/// * `400 Bad Request` - malformed email or password shorter than 8 chars
/// * `409 Conflict` - a user with this email already exists (including the
///   case where a concurrent registration wins the insert race)
/// * `503 Service Unavailable` - database not configured
/// * `500 Internal Server Error` - hashing or store failure
pub async fn register(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        AuthError::StoreUnavailable
    })?;
    tracing::info!("Registration request for email: {}", request.email);

    if !is_valid_email(&request.email) {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err(AuthError::invalid_input("Invalid email format"));
    }

    if request.password.len() < 8 {
        tracing::warn!("Password too short for {}", request.email);
        return Err(AuthError::invalid_input(
            "Password must be at least 8 characters",
        ));
    }

    if get_user_by_email(&pool, &request.email).await?.is_some() {
        tracing::warn!("Email already registered: {}", request.email);
        return Err(AuthError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;

    let user = match create_user(&pool, &request.email, Some(&password_hash)).await {
        Ok(user) => user,
        // The pre-check above raced a concurrent registration; the store's
        // unique constraint is the arbiter.
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            tracing::warn!("Concurrent registration for {}", request.email);
            return Err(AuthError::conflict("Email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("User created successfully: {}", user.email);

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(is_valid_email("a@b.io"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user@domain."));
        assert!(!is_valid_email("user@domain.c"));
        assert!(!is_valid_email("user@domain.123"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("sp ace@example.com"));
    }
}
