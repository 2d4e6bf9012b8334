//! Authentication Module
//!
//! This module owns the whole sign-in surface: registration, the
//! credential and OAuth sign-in paths, session tokens, and the decision
//! logic that ties them together.
//!
//! # Architecture
//!
//! - **`provider`** - the closed set of sign-in providers
//! - **`users`** - user record model and database operations
//! - **`decision`** - the authentication decision: credential verifier,
//!   OAuth reconciler, and the dispatching `decide` function
//! - **`sessions`** - JWT session token generation and validation
//! - **`oauth`** - OAuth client plumbing (authorize URLs, CSRF state,
//!   code exchange, identity email retrieval)
//! - **`handlers`** - HTTP handlers for the authentication endpoints
//!
//! # Authentication Flow
//!
//! 1. **Register**: email + password → validated → user created
//! 2. **Credential sign-in**: email + password → decision → token
//! 3. **OAuth sign-in**: provider redirect → callback → identity email →
//!    decision (reconciling a local record) → token
//! 4. **Current user**: token → verified → user info
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage and never compared
//!   in plaintext
//! - Session tokens are stateless JWTs with a 30-day expiry
//! - Credential denials are indistinguishable to the client

/// Sign-in provider set
pub mod provider;

/// User data model and database operations
pub mod users;

/// Authentication decision logic
pub mod decision;

/// JWT session tokens
pub mod sessions;

/// OAuth client plumbing
pub mod oauth;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use decision::{decide, Decision, DenyReason, SignInAttempt};
pub use handlers::{get_me, login, oauth_authorize, oauth_callback, oauth_callback_form, register};
pub use provider::Provider;
pub use users::User;
