/**
 * Service Error Types
 *
 * This module defines the error taxonomy used by the HTTP handlers:
 *
 * - `InvalidInput` - client mistake, recoverable by correcting the form
 * - `Conflict` - the email is already registered
 * - `Denied` - authentication refused, with the precise reason kept for
 *   logs and tests
 * - infrastructure faults (store, hashing, tokens, OAuth exchange) that
 *   surface to the client without internal detail
 *
 * Every variant maps to an HTTP status and a public message; the mapping
 * to a response body lives in `conversion`.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::auth::decision::DenyReason;
use crate::auth::provider::Provider;

/// Errors surfaced by the authentication handlers
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed registration or sign-in input
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The email is already registered
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// A sign-in attempt was refused
    #[error("authentication denied: {0}")]
    Denied(DenyReason),

    /// A third-party provider without configured client credentials
    #[error("provider {provider} is not configured")]
    ProviderNotConfigured { provider: Provider },

    /// The user store is not configured at all
    #[error("user store not configured")]
    StoreUnavailable,

    /// User store failure
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Password hashing failure
    #[error("password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Session token creation or verification failure
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// OAuth exchange or identity lookup failure
    #[error("oauth error: {message}")]
    OAuth { message: String },
}

impl AuthError {
    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an OAuth error
    pub fn oauth(message: impl Into<String>) -> Self {
        Self::OAuth {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Denied(_) => StatusCode::UNAUTHORIZED,
            Self::ProviderNotConfigured { .. } | Self::StoreUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Storage(_) | Self::Hashing(_) | Self::Token(_) | Self::OAuth { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the client
    ///
    /// Infrastructure faults are collapsed to a generic message; the full
    /// error is logged where it occurred.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => message.clone(),
            Self::Conflict { message } => message.clone(),
            Self::Denied(reason) => reason.public_message().to_string(),
            Self::ProviderNotConfigured { provider } => {
                format!("sign-in with {} is not configured", provider)
            }
            Self::StoreUnavailable => "service unavailable".to_string(),
            Self::Storage(_) | Self::Hashing(_) | Self::Token(_) => {
                "internal server error".to_string()
            }
            Self::OAuth { .. } => "sign-in could not be completed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AuthError::invalid_input("bad email").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::conflict("email already registered").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::Denied(DenyReason::IncorrectPassword).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ProviderNotConfigured {
                provider: Provider::Apple
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AuthError::oauth("exchange failed").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_denied_storage_stays_generic() {
        let err = AuthError::Denied(DenyReason::Storage);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(!err.public_message().contains("storage"));
    }

    #[test]
    fn test_infrastructure_detail_not_leaked() {
        let err = AuthError::oauth("token endpoint returned 500 with secrets");
        assert_eq!(err.public_message(), "sign-in could not be completed");
    }

    #[test]
    fn test_input_messages_pass_through() {
        let err = AuthError::invalid_input("Password must be at least 8 characters");
        assert_eq!(err.public_message(), "Password must be at least 8 characters");
    }
}
