/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * the API routes and the static presentation pages into a single Axum
 * router.
 *
 * # Route Order
 *
 * API routes are registered first and take precedence; anything else
 * falls through to the static file service that serves the login,
 * register and dashboard pages from `public/`.
 */

use axum::Router;
use tower_http::services::ServeDir;

use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state (store handle, provider registry,
///   pending authorizations)
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();

    // API routes
    let router = configure_api_routes(router, &app_state);

    // Presentation pages (login, register, dashboard)
    let router = router.fallback_service(ServeDir::new("public"));

    router.with_state(app_state)
}
