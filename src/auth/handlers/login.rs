/**
 * Login Handler
 *
 * This module implements the credential sign-in handler for
 * POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Build a credentials sign-in attempt from the request
 * 2. Run it through the authentication decision
 * 3. On allow, issue a session token and return it with the user info
 *
 * # Security
 *
 * - Passwords are verified with bcrypt inside the decision logic
 * - Every denial answers 401 with the same body, so clients cannot
 *   distinguish "no such user" from "incorrect password"; the precise
 *   reason goes to the log only
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::decision::{decide, Decision, SignInAttempt};
use crate::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::auth::sessions::create_token;
use crate::error::AuthError;

/// Login handler
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Login request containing email and password
///
/// # Returns
///
/// JSON response with the session token and user info, or an error
///
/// # Errors
///
/// * `401 Unauthorized` - unknown email, wrong password, or an account
///   that has no password (provisioned through a third-party sign-in)
/// * `503 Service Unavailable` - database not configured
/// * `500 Internal Server Error` - token generation failure
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        AuthError::StoreUnavailable
    })?;
    tracing::info!("Login request for: {}", request.email);

    let attempt = SignInAttempt::Credentials {
        email: request.email,
        password: request.password,
    };

    let user = match decide(&pool, attempt).await {
        Decision::Allow(user) => user,
        Decision::Deny(reason) => {
            tracing::warn!("Credential sign-in denied: {}", reason);
            return Err(AuthError::Denied(reason));
        }
    };

    let token = create_token(user.id, user.email.clone())?;

    tracing::info!("User logged in successfully: {}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
