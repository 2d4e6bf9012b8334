/**
 * Authentication Decision
 *
 * A single decision function is invoked per sign-in attempt. It dispatches
 * on the provider carried by the attempt: the credentials variant goes to
 * the credential verifier, every external variant goes to the OAuth
 * reconciler. Two terminal outcomes exist, allow and deny; there is no
 * further state machine, no retries, no backoff.
 *
 * Storage failures never escape as panics or raw errors. The attempt is
 * denied, the underlying fault is logged here with full detail.
 */

use std::fmt;

use sqlx::PgPool;

use crate::auth::provider::Provider;
use crate::auth::users::{self, User};

/// One sign-in attempt, tagged by provider
///
/// The enum is closed: adding a provider forces every `match` below to be
/// revisited, so "unsupported provider" cannot arise past this point.
#[derive(Debug, Clone)]
pub enum SignInAttempt {
    /// Local email + password sign-in
    Credentials { email: String, password: String },
    /// GitHub-authenticated identity
    GitHub { email: String },
    /// Google-authenticated identity
    Google { email: String },
    /// Apple-authenticated identity
    Apple { email: String },
}

impl SignInAttempt {
    /// Build an attempt for an externally authenticated identity.
    ///
    /// Returns `None` for `Provider::Credentials` — that path carries a
    /// password and is constructed directly.
    pub fn external(provider: Provider, email: String) -> Option<Self> {
        match provider {
            Provider::Credentials => None,
            Provider::GitHub => Some(SignInAttempt::GitHub { email }),
            Provider::Google => Some(SignInAttempt::Google { email }),
            Provider::Apple => Some(SignInAttempt::Apple { email }),
        }
    }

    /// The provider this attempt authenticates with
    pub fn provider(&self) -> Provider {
        match self {
            SignInAttempt::Credentials { .. } => Provider::Credentials,
            SignInAttempt::GitHub { .. } => Provider::GitHub,
            SignInAttempt::Google { .. } => Provider::Google,
            SignInAttempt::Apple { .. } => Provider::Apple,
        }
    }
}

/// Why a sign-in attempt was refused
///
/// The precise reason is kept for logs and tests; the HTTP layer collapses
/// credential denials into one uniform message (see `public_message`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No user record matches the presented email
    UnknownUser,
    /// The stored hash does not match the presented password
    IncorrectPassword,
    /// The account exists but has no password hash (provisioned through a
    /// third-party sign-in)
    NoPasswordSet,
    /// A provider name outside the supported set reached the boundary
    UnsupportedProvider,
    /// The user store failed; detail is in the logs, not here
    Storage,
}

impl DenyReason {
    /// Message safe to return to the end user.
    ///
    /// Credential denials are indistinguishable from each other to avoid
    /// account enumeration; storage denials leak no internal detail.
    pub fn public_message(self) -> &'static str {
        match self {
            DenyReason::UnknownUser
            | DenyReason::IncorrectPassword
            | DenyReason::NoPasswordSet => "invalid email or password",
            DenyReason::UnsupportedProvider => "unsupported sign-in provider",
            DenyReason::Storage => "sign-in failed, please try again",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DenyReason::UnknownUser => "no such user",
            DenyReason::IncorrectPassword => "incorrect password",
            DenyReason::NoPasswordSet => "password sign-in not available for this account",
            DenyReason::UnsupportedProvider => "unsupported provider",
            DenyReason::Storage => "storage error",
        };
        f.write_str(s)
    }
}

/// Terminal outcome of a sign-in attempt
#[derive(Debug, Clone)]
pub enum Decision {
    /// Attempt accepted; carries the matched (or newly created) user record
    Allow(User),
    /// Attempt refused
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Decide a sign-in attempt
///
/// Routes the attempt to the credential verifier or the OAuth reconciler
/// depending on its provider. This is the only entry point the sign-in
/// handlers use.
pub async fn decide(pool: &PgPool, attempt: SignInAttempt) -> Decision {
    match attempt {
        SignInAttempt::Credentials { email, password } => {
            verify_credentials(pool, &email, &password).await
        }
        SignInAttempt::GitHub { email } => reconcile(pool, Provider::GitHub, &email).await,
        SignInAttempt::Google { email } => reconcile(pool, Provider::Google, &email).await,
        SignInAttempt::Apple { email } => reconcile(pool, Provider::Apple, &email).await,
    }
}

/// Verify an email + password pair against the user store
///
/// # Outcomes
///
/// * no matching user → `Deny(UnknownUser)`
/// * account without a password hash → `Deny(NoPasswordSet)`; this is the
///   OAuth-provisioned account case and is rejected explicitly rather than
///   handed to bcrypt with a missing hash
/// * hash mismatch → `Deny(IncorrectPassword)`
/// * hash match → `Allow`
/// * store or hash-parse failure → `Deny(Storage)`
pub async fn verify_credentials(pool: &PgPool, email: &str, password: &str) -> Decision {
    let user = match users::get_user_by_email(pool, email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Decision::Deny(DenyReason::UnknownUser),
        Err(e) => {
            tracing::error!("User lookup failed for {}: {:?}", email, e);
            return Decision::Deny(DenyReason::Storage);
        }
    };

    let Some(hash) = user.password_hash.as_deref() else {
        return Decision::Deny(DenyReason::NoPasswordSet);
    };

    match bcrypt::verify(password, hash) {
        Ok(true) => Decision::Allow(user),
        Ok(false) => Decision::Deny(DenyReason::IncorrectPassword),
        Err(e) => {
            // A stored hash bcrypt cannot parse is a data fault, not a
            // wrong password.
            tracing::error!("Password verification error for {}: {:?}", email, e);
            Decision::Deny(DenyReason::Storage)
        }
    }
}

/// Reconcile an externally authenticated identity with the user store
///
/// Looks the email up and creates a passwordless user record on first
/// sign-in. Always allows once the lookup/creation completes; a concurrent
/// first sign-in that loses the insert race re-fetches the winner's row.
pub async fn reconcile(pool: &PgPool, provider: Provider, email: &str) -> Decision {
    match users::get_user_by_email(pool, email).await {
        Ok(Some(user)) => Decision::Allow(user),
        Ok(None) => create_external_user(pool, provider, email).await,
        Err(e) => {
            tracing::error!("User lookup failed for {} via {}: {:?}", email, provider, e);
            Decision::Deny(DenyReason::Storage)
        }
    }
}

async fn create_external_user(pool: &PgPool, provider: Provider, email: &str) -> Decision {
    match users::create_user(pool, email, None).await {
        Ok(user) => {
            tracing::info!("Created user {} on first {} sign-in", email, provider);
            Decision::Allow(user)
        }
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            // Two first sign-ins raced; the other request created the row.
            match users::get_user_by_email(pool, email).await {
                Ok(Some(user)) => Decision::Allow(user),
                Ok(None) | Err(_) => {
                    tracing::error!("Lost insert race for {} but re-fetch failed", email);
                    Decision::Deny(DenyReason::Storage)
                }
            }
        }
        Err(e) => {
            tracing::error!("Failed to create user {} via {}: {:?}", email, provider, e);
            Decision::Deny(DenyReason::Storage)
        }
    }
}
