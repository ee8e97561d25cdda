//! Shared client-side session infrastructure for DentNotion.
//!
//! The `auth` module is the single authority for "who is logged in": it owns
//! the token lifecycle, the persisted session record, and the route-guard
//! decisions derived from session state.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::client::{AuthClient, AuthClientError};
pub use auth::guard::{evaluate_route, preflight, PreflightAction, RouteDecision};
pub use auth::storage::{FileSessionStorage, StorageError};
pub use auth::store::{SessionError, SessionPhase, SessionSnapshot, SessionStore};
pub use auth::traits::{AuthApi, SessionStorage};
pub use auth::types::{AuthGrant, PersistedSession, RefreshGrant, SessionTokens};
