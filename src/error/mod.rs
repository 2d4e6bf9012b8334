//! Error Module
//!
//! Error taxonomy for the authentication service and its conversion to
//! HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - Error type, status and public-message mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Taxonomy
//!
//! - `InvalidInput` (400) - client mistake, user corrects and resubmits
//! - `Conflict` (409) - email already registered
//! - `Denied` (401) - authentication refused; carries a [`DenyReason`]
//! - `ProviderNotConfigured` / `StoreUnavailable` (503)
//! - `Storage` / `Hashing` / `Token` / `OAuth` (500) - infrastructure
//!   faults, surfaced without internal detail
//!
//! No operation is retried automatically; every failure is surfaced to
//! the caller for explicit re-attempt.
//!
//! [`DenyReason`]: crate::auth::decision::DenyReason

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::AuthError;
