/**
 * Authentication Middleware
 *
 * Middleware for routes that require a signed-in user. It extracts and
 * verifies the JWT from the Authorization header, confirms the user still
 * exists, and attaches the identity to the request extensions for the
 * handlers behind it.
 */

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::decision::DenyReason;
use crate::auth::sessions::verify_token;
use crate::auth::users::get_user_by_id;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Authenticated user data extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Authentication middleware
///
/// 1. Extracts the JWT from the Authorization header (`Bearer <token>`)
/// 2. Verifies the token
/// 3. Confirms the user still exists in the store
/// 4. Attaches an [`AuthenticatedUser`] to the request extensions
///
/// Answers 401 for a missing or invalid token.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            AuthError::Denied(DenyReason::UnknownUser)
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        AuthError::Denied(DenyReason::UnknownUser)
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        AuthError::Denied(DenyReason::UnknownUser)
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| {
            tracing::error!("Invalid user ID in token: {:?}", e);
            AuthError::Denied(DenyReason::UnknownUser)
        })?;

    if let Some(pool) = &app_state.db_pool {
        if let Err(e) = verify_user_exists(pool, user_id).await {
            tracing::warn!("Token user not found in store: {:?}", e);
            return Err(AuthError::Denied(DenyReason::UnknownUser));
        }
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Verify the user behind a token still exists
async fn verify_user_exists(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    get_user_by_id(pool, user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok(())
}

/// Axum extractor for the authenticated user
///
/// Usable as a handler parameter behind [`auth_middleware`]; rejects with
/// 401 if the middleware did not run.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                AuthError::Denied(DenyReason::UnknownUser)
            })?;

        Ok(AuthUser(user))
    }
}
