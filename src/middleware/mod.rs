//! Middleware Module
//!
//! Request-processing middleware. Currently only token verification for
//! session-gated routes.

/// Authentication middleware and extractor
pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
