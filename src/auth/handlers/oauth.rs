/**
 * OAuth Sign-In Handlers
 *
 * Two handlers implement the redirect dance with a third-party provider:
 *
 * - `GET /api/auth/signin/{provider}` sends the browser to the provider's
 *   authorization page with a freshly issued CSRF state
 * - `GET|POST /api/auth/callback/{provider}` receives the provider's
 *   answer, redeems the state, exchanges the code, resolves the identity
 *   email, and runs the authentication decision
 *
 * GitHub and Google return to the callback with query parameters; Apple
 * posts a form (`form_post` response mode), so the callback route accepts
 * both shapes.
 *
 * On allow the browser is redirected to the dashboard with the session
 * token in the URL fragment; on deny it is sent back to the login page
 * with an error hint. Infrastructure failures surface as JSON errors.
 */

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form,
};

use crate::auth::decision::{decide, Decision, DenyReason, SignInAttempt};
use crate::auth::handlers::types::CallbackParams;
use crate::auth::oauth::fetch_identity_email;
use crate::auth::provider::Provider;
use crate::auth::sessions::create_token;
use crate::error::AuthError;
use crate::server::state::AppState;

/// Parse a provider route parameter for the redirect flow
///
/// Unknown names are a deny, and the credentials provider has no redirect
/// flow at all.
fn parse_external_provider(name: &str) -> Result<Provider, AuthError> {
    let provider: Provider = name.parse().map_err(|_| {
        tracing::warn!("Sign-in attempt with unsupported provider: {}", name);
        AuthError::Denied(DenyReason::UnsupportedProvider)
    })?;

    if !provider.is_external() {
        return Err(AuthError::invalid_input(
            "the credentials provider does not use a redirect flow",
        ));
    }

    Ok(provider)
}

/// Authorization redirect handler
///
/// # Arguments
///
/// * `State(app_state)` - Application state (provider registry, pending
///   authorizations)
/// * `Path(provider)` - Provider name from the route
///
/// # Returns
///
/// `303` redirect to the provider's authorization page
///
/// # Errors
///
/// * `400 Bad Request` - the credentials provider was named
/// * `401 Unauthorized` - unknown provider name
/// * `503 Service Unavailable` - provider has no configured credentials
pub async fn oauth_authorize(
    State(app_state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Redirect, AuthError> {
    let provider = parse_external_provider(&provider)?;

    let (url, state) = app_state.oauth.authorize_redirect(provider)?;
    app_state.pending_authorizations.insert(state, provider);

    tracing::info!("Redirecting sign-in to {}", provider);
    Ok(Redirect::to(&url))
}

/// Callback handler for providers answering with query parameters
pub async fn oauth_callback(
    State(app_state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, AuthError> {
    handle_callback(app_state, &provider, params).await
}

/// Callback handler for providers answering with a posted form (Apple)
pub async fn oauth_callback_form(
    State(app_state): State<AppState>,
    Path(provider): Path<String>,
    Form(params): Form<CallbackParams>,
) -> Result<Redirect, AuthError> {
    handle_callback(app_state, &provider, params).await
}

async fn handle_callback(
    app_state: AppState,
    provider_name: &str,
    params: CallbackParams,
) -> Result<Redirect, AuthError> {
    let provider = parse_external_provider(provider_name)?;

    // The user declined at the provider; nothing to decide.
    if let Some(error) = params.error {
        tracing::warn!("{} callback returned error: {}", provider, error);
        return Ok(Redirect::to("/login.html?error=access_denied"));
    }

    let code = params
        .code
        .ok_or_else(|| AuthError::invalid_input("missing authorization code"))?;
    let state = params
        .state
        .ok_or_else(|| AuthError::invalid_input("missing oauth state"))?;

    if !app_state.pending_authorizations.consume(&state, provider) {
        tracing::warn!("{} callback presented unknown or stale state", provider);
        return Err(AuthError::invalid_input("invalid or expired oauth state"));
    }

    let token_response = app_state.oauth.exchange_code(provider, code).await?;

    let settings = app_state
        .oauth
        .settings(provider)
        .ok_or(AuthError::ProviderNotConfigured { provider })?;
    let email =
        fetch_identity_email(&app_state.http, provider, settings, &token_response).await?;

    let pool = app_state.db_pool.as_ref().ok_or_else(|| {
        tracing::error!("Database not configured");
        AuthError::StoreUnavailable
    })?;

    // Provider is external by construction, so the attempt always exists.
    let attempt = SignInAttempt::external(provider, email.clone())
        .ok_or_else(|| AuthError::oauth("credentials provider reached the oauth callback"))?;

    match decide(pool, attempt).await {
        Decision::Allow(user) => {
            let token = create_token(user.id, user.email.clone())?;
            tracing::info!("User {} signed in via {}", user.email, provider);
            Ok(Redirect::to(&format!("/dashboard.html#token={}", token)))
        }
        Decision::Deny(reason) => {
            tracing::warn!("{} sign-in denied for {}: {}", provider, email, reason);
            Ok(Redirect::to("/login.html?error=signin_failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_external_provider() {
        assert_eq!(parse_external_provider("github").unwrap(), Provider::GitHub);
        assert_eq!(parse_external_provider("apple").unwrap(), Provider::Apple);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = parse_external_provider("gitlab").unwrap_err();
        assert!(matches!(
            err,
            AuthError::Denied(DenyReason::UnsupportedProvider)
        ));
    }

    #[test]
    fn test_parse_rejects_credentials() {
        let err = parse_external_provider("credentials").unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput { .. }));
    }
}
