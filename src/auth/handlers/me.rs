/**
 * Get Current User Handler
 *
 * Handler for GET /api/auth/me, which returns the user behind the
 * presented session token. The route sits behind the auth middleware, so
 * the handler receives an already-verified identity via the `AuthUser`
 * extractor and only has to fetch the fresh record.
 */

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::auth::decision::DenyReason;
use crate::auth::handlers::types::UserResponse;
use crate::auth::users::get_user_by_id;
use crate::error::AuthError;
use crate::middleware::auth::AuthUser;

/// Get current user handler
///
/// # Returns
///
/// JSON response with the public user info
///
/// # Errors
///
/// * `401 Unauthorized` - the token's user no longer exists (the
///   middleware rejects missing/invalid tokens before this runs)
/// * `503 Service Unavailable` - database not configured
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<UserResponse>, AuthError> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        AuthError::StoreUnavailable
    })?;

    let user = get_user_by_id(&pool, identity.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token user no longer exists: {}", identity.user_id);
            AuthError::Denied(DenyReason::UnknownUser)
        })?;

    Ok(Json(user.into()))
}
