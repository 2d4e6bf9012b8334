/**
 * Authentication Handler Types
 *
 * Request and response types shared by the registration, login, OAuth and
 * current-user handlers.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::User;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// User's email address
    pub email: String,
    /// User's password (hashed before storage, never stored as-is)
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password (verified against the stored hash)
    pub password: String,
}

/// Auth response
///
/// Returned by the login handler. Contains the session token and the
/// public user representation.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// JWT session token (30-day expiration)
    pub token: String,
    /// User information (without sensitive data)
    pub user: UserResponse,
}

/// User response (without sensitive data)
///
/// The only user representation that crosses the HTTP boundary; the
/// password hash never does.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    /// User's unique ID (UUID)
    pub id: String,
    /// User's email address
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
        }
    }
}

/// Parameters a provider sends back to the OAuth callback
///
/// GitHub and Google deliver these as query parameters; Apple posts them
/// as a form. A user who cancels at the provider comes back with `error`
/// set instead of `code`.
#[derive(Deserialize, Debug, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
