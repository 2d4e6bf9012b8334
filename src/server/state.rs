/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container:
 * - the user store handle (an optional connection pool, acquired once at
 *   startup and injected everywhere it is needed)
 * - the OAuth provider registry (static configuration)
 * - the pending-authorization store for outstanding OAuth redirects
 * - a shared HTTP client for provider userinfo calls
 *
 * # Thread Safety
 *
 * All fields are cheap to clone and safe to share: `PgPool` and
 * `reqwest::Client` are internally reference-counted, the registry is
 * behind an `Arc`, and the pending store wraps its map in `Arc<Mutex>`.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract just the part of the
 * state they need instead of the whole `AppState`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::oauth::{OAuthRegistry, PendingAuthorizations};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// User store handle
    ///
    /// `None` if the database is not configured (`DATABASE_URL` unset or
    /// unreachable at startup). Handlers answer 503 in that case instead
    /// of crashing.
    pub db_pool: Option<PgPool>,

    /// Configured third-party sign-in providers
    pub oauth: Arc<OAuthRegistry>,

    /// Outstanding OAuth authorization redirects, keyed by CSRF state
    pub pending_authorizations: PendingAuthorizations,

    /// Shared HTTP client for provider identity lookups
    pub http: reqwest::Client,
}

/// Allow handlers to extract the store handle directly
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Allow handlers to extract the provider registry directly
impl FromRef<AppState> for Arc<OAuthRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.oauth.clone()
    }
}

/// Allow handlers to extract the pending-authorization store directly
impl FromRef<AppState> for PendingAuthorizations {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pending_authorizations.clone()
    }
}
