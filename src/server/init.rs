/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server: state creation, store acquisition, provider registry loading,
 * and route configuration.
 *
 * # Initialization Process
 *
 * 1. Acquire the user store handle (optional; 503s without it)
 * 2. Load the OAuth provider registry from the environment
 * 3. Create the pending-authorization store and its cleanup task
 * 4. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;

use crate::auth::oauth::{OAuthRegistry, PendingAuthorizations};
use crate::routes::router::create_router;
use crate::server::config::load_database;
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Error Handling
///
/// Startup is resilient: a missing database or an unconfigured provider
/// disables that piece and the rest of the service keeps working.
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing gatehouse server");

    let db_pool = load_database().await;
    let oauth = Arc::new(OAuthRegistry::from_env());
    let pending_authorizations = PendingAuthorizations::new();

    let app_state = AppState {
        db_pool,
        oauth,
        pending_authorizations: pending_authorizations.clone(),
        http: reqwest::Client::new(),
    };

    let app = create_router(app_state);

    // Periodically drop authorization redirects that were never redeemed
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            pending_authorizations.purge_expired();
            tracing::debug!("Purged expired pending authorizations");
        }
    });

    tracing::info!("Router configured with pending-authorization cleanup task");

    app
}
