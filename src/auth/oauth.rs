/**
 * OAuth Client Plumbing
 *
 * This module owns everything between "user clicked a provider button" and
 * "we hold the identity email the provider vouches for":
 *
 * - per-provider client configuration (id/secret from the environment,
 *   endpoint URLs with overridable defaults)
 * - the pending-authorization store that pairs an outgoing CSRF `state`
 *   with the provider it was issued for
 * - authorization-code exchange via the `oauth2` crate
 * - identity email retrieval (userinfo endpoints for GitHub and Google,
 *   `id_token` claims for Apple)
 *
 * The reconciliation of that email with the local user store lives in
 * `auth::decision`, not here.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret, CsrfToken, ExtraTokenFields,
    RedirectUrl, RevocationErrorResponseType, Scope, StandardErrorResponse, StandardRevocableToken,
    StandardTokenIntrospectionResponse, StandardTokenResponse, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};

use crate::auth::provider::Provider;
use crate::error::AuthError;

/// How long an outstanding authorization redirect stays valid
const PENDING_TTL: Duration = Duration::from_secs(10 * 60);

/// Extra token-endpoint fields beyond the OAuth basics
///
/// Apple returns the identity inside an `id_token`; GitHub and Google
/// leave the field absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl ExtraTokenFields for IdTokenFields {}

/// Token endpoint response shared by all configured providers
pub type ProviderTokenResponse = StandardTokenResponse<IdTokenFields, BasicTokenType>;

/// OAuth client specialized to capture an optional `id_token`
pub type ProviderClient = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    ProviderTokenResponse,
    BasicTokenType,
    StandardTokenIntrospectionResponse<IdTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
>;

/// Static configuration for one third-party provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    /// Userinfo endpoint; `None` for providers whose email arrives in the
    /// `id_token` instead
    pub userinfo_url: Option<String>,
    pub scopes: Vec<String>,
}

impl ProviderSettings {
    /// Built-in endpoints for a provider, with credentials supplied
    pub fn defaults(provider: Provider, client_id: String, client_secret: String) -> Option<Self> {
        match provider {
            Provider::Credentials => None,
            Provider::GitHub => Some(Self {
                client_id,
                client_secret,
                auth_url: "https://github.com/login/oauth/authorize".to_string(),
                token_url: "https://github.com/login/oauth/access_token".to_string(),
                userinfo_url: Some("https://api.github.com/user".to_string()),
                scopes: vec!["read:user".to_string(), "user:email".to_string()],
            }),
            Provider::Google => Some(Self {
                client_id,
                client_secret,
                auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
                userinfo_url: Some("https://openidconnect.googleapis.com/v1/userinfo".to_string()),
                scopes: vec!["openid".to_string(), "email".to_string()],
            }),
            Provider::Apple => Some(Self {
                client_id,
                client_secret,
                auth_url: "https://appleid.apple.com/auth/authorize".to_string(),
                token_url: "https://appleid.apple.com/auth/token".to_string(),
                userinfo_url: None,
                scopes: vec!["email".to_string()],
            }),
        }
    }
}

/// Configured third-party providers plus the redirect base URL
///
/// A provider missing its client credentials is simply absent: the signin
/// endpoint reports it as not configured without touching anything else.
#[derive(Debug, Clone, Default)]
pub struct OAuthRegistry {
    providers: HashMap<Provider, ProviderSettings>,
    redirect_base: String,
}

impl OAuthRegistry {
    pub fn new(redirect_base: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            redirect_base: redirect_base.into(),
        }
    }

    /// Register (or replace) a provider configuration
    pub fn insert(&mut self, provider: Provider, settings: ProviderSettings) {
        self.providers.insert(provider, settings);
    }

    /// Load provider configuration from the environment
    ///
    /// For each of GitHub/Google/Apple, `{PREFIX}_CLIENT_ID` and
    /// `{PREFIX}_CLIENT_SECRET` enable the provider; endpoint URLs default
    /// to the vendor's and can be overridden with `{PREFIX}_AUTH_URL`,
    /// `{PREFIX}_TOKEN_URL` and `{PREFIX}_USERINFO_URL`. The redirect base
    /// comes from `PUBLIC_URL`.
    pub fn from_env() -> Self {
        let redirect_base = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let mut registry = Self::new(redirect_base);

        for provider in [Provider::GitHub, Provider::Google, Provider::Apple] {
            let prefix = provider.as_str().to_ascii_uppercase();
            let client_id = std::env::var(format!("{}_CLIENT_ID", prefix));
            let client_secret = std::env::var(format!("{}_CLIENT_SECRET", prefix));

            let (Ok(client_id), Ok(client_secret)) = (client_id, client_secret) else {
                tracing::info!("OAuth provider {} not configured, skipping", provider);
                continue;
            };

            let Some(mut settings) = ProviderSettings::defaults(provider, client_id, client_secret)
            else {
                continue;
            };
            if let Ok(url) = std::env::var(format!("{}_AUTH_URL", prefix)) {
                settings.auth_url = url;
            }
            if let Ok(url) = std::env::var(format!("{}_TOKEN_URL", prefix)) {
                settings.token_url = url;
            }
            if let Ok(url) = std::env::var(format!("{}_USERINFO_URL", prefix)) {
                settings.userinfo_url = Some(url);
            }

            tracing::info!("OAuth provider {} configured", provider);
            registry.insert(provider, settings);
        }

        registry
    }

    /// Settings for a provider, if configured
    pub fn settings(&self, provider: Provider) -> Option<&ProviderSettings> {
        self.providers.get(&provider)
    }

    /// The callback URL registered with each provider
    pub fn redirect_url(&self, provider: Provider) -> String {
        format!(
            "{}/api/auth/callback/{}",
            self.redirect_base.trim_end_matches('/'),
            provider
        )
    }

    /// Build an `oauth2` client for a configured provider
    pub fn client(&self, provider: Provider) -> Result<ProviderClient, AuthError> {
        let settings = self
            .settings(provider)
            .ok_or(AuthError::ProviderNotConfigured { provider })?;

        let auth_url = AuthUrl::new(settings.auth_url.clone())
            .map_err(|e| AuthError::oauth(format!("invalid {} auth URL: {}", provider, e)))?;
        let token_url = TokenUrl::new(settings.token_url.clone())
            .map_err(|e| AuthError::oauth(format!("invalid {} token URL: {}", provider, e)))?;
        let redirect_url = RedirectUrl::new(self.redirect_url(provider))
            .map_err(|e| AuthError::oauth(format!("invalid {} redirect URL: {}", provider, e)))?;

        Ok(Client::new(
            ClientId::new(settings.client_id.clone()),
            Some(ClientSecret::new(settings.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url))
    }

    /// Build the authorization redirect for a provider
    ///
    /// Returns the provider URL to send the browser to and the CSRF state
    /// the callback must present back.
    pub fn authorize_redirect(&self, provider: Provider) -> Result<(String, String), AuthError> {
        let settings = self
            .settings(provider)
            .ok_or(AuthError::ProviderNotConfigured { provider })?;
        let client = self.client(provider)?;

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in &settings.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        let (url, csrf) = request.url();

        Ok((url.to_string(), csrf.secret().clone()))
    }

    /// Exchange an authorization code for the provider's token response
    pub async fn exchange_code(
        &self,
        provider: Provider,
        code: String,
    ) -> Result<ProviderTokenResponse, AuthError> {
        let client = self.client(provider)?;
        client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| {
                tracing::warn!("Code exchange with {} failed: {}", provider, e);
                AuthError::oauth(format!("code exchange with {} failed", provider))
            })
    }
}

/// Outstanding authorization redirects, keyed by CSRF state
///
/// Shared across handlers; a background task purges entries that were
/// never redeemed.
#[derive(Clone, Default)]
pub struct PendingAuthorizations {
    inner: Arc<Mutex<HashMap<String, Pending>>>,
}

struct Pending {
    provider: Provider,
    issued_at: Instant,
}

impl PendingAuthorizations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a state issued for a provider redirect
    pub fn insert(&self, state: String, provider: Provider) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(
            state,
            Pending {
                provider,
                issued_at: Instant::now(),
            },
        );
    }

    /// Redeem a state presented by a callback
    ///
    /// Returns true only if the state exists, is fresh, and was issued for
    /// this provider. The entry is consumed either way a match is found.
    pub fn consume(&self, state: &str, provider: Provider) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.remove(state) {
            Some(pending) => {
                pending.provider == provider && pending.issued_at.elapsed() < PENDING_TTL
            }
            None => false,
        }
    }

    /// Drop entries past their TTL
    pub fn purge_expired(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.retain(|_, pending| pending.issued_at.elapsed() < PENDING_TTL);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Obtain the identity email the provider vouches for
///
/// GitHub and Google expose it through a userinfo endpoint; Apple embeds
/// it in the `id_token` returned alongside the access token.
pub async fn fetch_identity_email(
    http: &reqwest::Client,
    provider: Provider,
    settings: &ProviderSettings,
    token: &ProviderTokenResponse,
) -> Result<String, AuthError> {
    match provider {
        Provider::Credentials => Err(AuthError::oauth(
            "the credentials provider has no external identity",
        )),
        Provider::GitHub => github_email(http, settings, token.access_token().secret()).await,
        Provider::Google => userinfo_email(http, provider, settings, token.access_token().secret()).await,
        Provider::Apple => apple_email(token),
    }
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct OidcUserInfo {
    email: Option<String>,
}

/// GitHub profile emails can be private; fall back to the emails endpoint
/// and pick the primary verified address.
async fn github_email(
    http: &reqwest::Client,
    settings: &ProviderSettings,
    access_token: &str,
) -> Result<String, AuthError> {
    let userinfo_url = settings
        .userinfo_url
        .as_deref()
        .ok_or_else(|| AuthError::oauth("github userinfo endpoint missing"))?;

    let user: GitHubUser = github_get(http, userinfo_url, access_token).await?;
    if let Some(email) = user.email {
        return Ok(email);
    }

    let emails_url = format!("{}/emails", userinfo_url.trim_end_matches('/'));
    let emails: Vec<GitHubEmail> = github_get(http, &emails_url, access_token).await?;
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .or_else(|| emails.first())
        .map(|e| e.email.clone())
        .ok_or_else(|| AuthError::oauth("github account has no usable email address"))
}

async fn github_get<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<T, AuthError> {
    http.get(url)
        .bearer_auth(access_token)
        .header(reqwest::header::USER_AGENT, "gatehouse")
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            tracing::warn!("GitHub API request to {} failed: {}", url, e);
            AuthError::oauth("github identity lookup failed")
        })?
        .json()
        .await
        .map_err(|e| {
            tracing::warn!("GitHub API response from {} unreadable: {}", url, e);
            AuthError::oauth("github identity lookup failed")
        })
}

async fn userinfo_email(
    http: &reqwest::Client,
    provider: Provider,
    settings: &ProviderSettings,
    access_token: &str,
) -> Result<String, AuthError> {
    let url = settings
        .userinfo_url
        .as_deref()
        .ok_or_else(|| AuthError::oauth(format!("{} userinfo endpoint missing", provider)))?;

    let info: OidcUserInfo = http
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            tracing::warn!("Userinfo request to {} failed: {}", provider, e);
            AuthError::oauth(format!("{} identity lookup failed", provider))
        })?
        .json()
        .await
        .map_err(|e| {
            tracing::warn!("Userinfo response from {} unreadable: {}", provider, e);
            AuthError::oauth(format!("{} identity lookup failed", provider))
        })?;

    info.email
        .ok_or_else(|| AuthError::oauth(format!("{} userinfo did not include an email", provider)))
}

#[derive(Debug, Deserialize)]
struct AppleIdTokenClaims {
    email: Option<String>,
}

/// Extract the email claim from Apple's `id_token`.
///
/// The token was just received from Apple's token endpoint over TLS, so
/// its signature is not re-verified here; only the claims are read.
fn apple_email(token: &ProviderTokenResponse) -> Result<String, AuthError> {
    let id_token = token
        .extra_fields()
        .id_token
        .as_deref()
        .ok_or_else(|| AuthError::oauth("apple token response did not include an id_token"))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;

    let data = decode_apple_claims(id_token, &validation)?;
    data.email
        .ok_or_else(|| AuthError::oauth("apple id_token did not include an email claim"))
}

fn decode_apple_claims(
    id_token: &str,
    validation: &Validation,
) -> Result<AppleIdTokenClaims, AuthError> {
    jsonwebtoken::decode::<AppleIdTokenClaims>(id_token, &DecodingKey::from_secret(&[]), validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("Apple id_token unreadable: {}", e);
            AuthError::oauth("apple id_token unreadable")
        })
}
