//! Gatehouse - Main Library
//!
//! Gatehouse is a credential- and OAuth-based authentication service:
//! user registration, password sign-in, third-party sign-in
//! (GitHub/Google/Apple), JWT session issuance, and a session-gated
//! current-user endpoint, plus the static pages that exercise the flow.
//!
//! # Module Structure
//!
//! - **`auth`** - providers, user store operations, the authentication
//!   decision, session tokens, OAuth plumbing, and the HTTP handlers
//! - **`middleware`** - token verification for session-gated routes
//! - **`error`** - error taxonomy and HTTP response conversion
//! - **`routes`** - router assembly
//! - **`server`** - initialization, application state, configuration
//!
//! # Usage
//!
//! ```rust,no_run
//! use gatehouse::server::create_app;
//!
//! # async fn example() {
//! let app = create_app().await;
//! // Use app with an Axum server
//! # }
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<_, AuthError>`; the error type maps itself to
//! an HTTP status and a JSON body without leaking internal detail.

/// Authentication: providers, decision logic, sessions, handlers
pub mod auth;

/// Error types and response conversion
pub mod error;

/// Request middleware
pub mod middleware;

/// Route configuration
pub mod routes;

/// Server setup and state
pub mod server;

// Re-export commonly used types
pub use auth::{decide, Decision, DenyReason, Provider, SignInAttempt, User};
pub use error::AuthError;
pub use server::{create_app, AppState};
