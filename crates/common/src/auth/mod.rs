//! Client-side session and authentication
//!
//! Single authority for the authenticated-user identity and the token
//! lifecycle. Consolidates everything the rest of the client needs to know
//! about "who is logged in".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  SessionStore   │  State machine + identity operations
//! └────────┬────────┘
//!          │
//!          ├──► AuthClient           (HTTP calls to the identity endpoints)
//!          ├──► SessionStorage       (Durable session record + guard hint)
//!          │
//!          └──► guard functions      (Pure route decisions over snapshots)
//! ```
//!
//! The store is generic over the [`traits::AuthApi`] and
//! [`traits::SessionStorage`] seams so tests can substitute scripted
//! transports and in-memory storage.
//!
//! # Session state machine
//!
//! `Unknown` (before the one-time restore) → `Anonymous` ⇄ `Authenticated`.
//! The user identity and the access token are set and cleared together;
//! a failed refresh always tears the whole session down.
//!
//! # Module Organization
//!
//! - **[`types`]**: Token/identity types and wire envelopes
//! - **[`client`]**: HTTP client for the `/auth/…` endpoints
//! - **[`storage`]**: File-backed session persistence and the guard hint
//! - **[`store`]**: The session store itself
//! - **[`guard`]**: Route-guard and pre-mount path decisions
//! - **[`traits`]**: Dependency-injection seams

pub mod client;
pub mod guard;
pub mod storage;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use client::{AuthClient, AuthClientError};
pub use guard::{evaluate_route, preflight, PreflightAction, RouteDecision};
pub use storage::{FileSessionStorage, StorageError};
pub use store::{SessionError, SessionPhase, SessionSnapshot, SessionStore};
pub use traits::{AuthApi, SessionStorage};
pub use types::{AuthGrant, PersistedSession, RefreshGrant, SessionTokens};
