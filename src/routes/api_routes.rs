/**
 * API Route Handlers
 *
 * Route configuration for the authentication API.
 *
 * # Routes
 *
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - Credential sign-in
 * - `GET  /api/auth/signin/{provider}` - Third-party authorization redirect
 * - `GET|POST /api/auth/callback/{provider}` - Third-party callback
 *   (Apple posts a form, GitHub and Google use query parameters)
 * - `GET  /api/auth/me` - Current user (requires a session token)
 */

use axum::Router;

use crate::auth::{
    get_me, login, oauth_authorize, oauth_callback, oauth_callback_form, register,
};
use crate::middleware::auth::auth_middleware;
use crate::server::state::AppState;

/// Configure API routes
///
/// Public routes are added directly; the current-user route is wrapped in
/// the token-verifying middleware.
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - Application state, needed to build the middleware layer
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/me", axum::routing::get(get_me))
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router
        // Registration and credential sign-in
        .route("/api/auth/register", axum::routing::post(register))
        .route("/api/auth/login", axum::routing::post(login))
        // Third-party sign-in
        .route(
            "/api/auth/signin/{provider}",
            axum::routing::get(oauth_authorize),
        )
        .route(
            "/api/auth/callback/{provider}",
            axum::routing::get(oauth_callback).post(oauth_callback_form),
        )
        // Session-gated routes
        .merge(protected)
}
