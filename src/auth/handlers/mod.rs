//! Authentication Handlers Module
//!
//! HTTP handlers for the authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Handler exports
//! ├── types.rs    - Request and response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - Credential sign-in handler
//! ├── oauth.rs    - Third-party sign-in handlers (redirect + callback)
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register - User registration
//! - **`login`** - POST /api/auth/login - Credential sign-in
//! - **`oauth_authorize`** - GET /api/auth/signin/{provider}
//! - **`oauth_callback`** - GET|POST /api/auth/callback/{provider}
//! - **`get_me`** - GET /api/auth/me - Current user info

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Third-party sign-in handlers
pub mod oauth;

/// Get current user handler
pub mod me;

// Re-export commonly used types
pub use types::{AuthResponse, CallbackParams, LoginRequest, RegisterRequest, UserResponse};

// Re-export handlers
pub use login::login;
pub use me::get_me;
pub use oauth::{oauth_authorize, oauth_callback, oauth_callback_form};
pub use register::register;
