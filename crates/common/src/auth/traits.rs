//! Traits for identity-endpoint and session-storage operations
//!
//! These traits enable dependency injection and testing by abstracting
//! external dependencies (the identity backend, durable client storage).

use std::time::Duration;

use async_trait::async_trait;

use super::client::AuthClientError;
use super::types::{AuthGrant, PersistedSession, RefreshGrant};

/// Trait for the identity endpoints
///
/// Abstracts the HTTP calls issued by the session store so tests can script
/// grants and rejections without a live backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Register a new account
    ///
    /// # Errors
    /// Returns error if the request fails or the backend rejects the signup
    async fn signup(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthGrant, AuthClientError>;

    /// Authenticate existing credentials
    ///
    /// # Errors
    /// Returns error if the request fails or the credentials are rejected
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, AuthClientError>;

    /// Exchange a refresh token for a rotated token pair
    ///
    /// # Errors
    /// Returns error if the token is empty, invalid, or the request fails
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshGrant, AuthClientError>;

    /// Notify the backend that the session is ending
    ///
    /// # Errors
    /// Returns error if the request fails; callers treat this as advisory
    async fn logout(&self, access_token: &str) -> Result<(), AuthClientError>;

    /// Request a password-reset email
    ///
    /// # Errors
    /// Returns error if the request fails or the backend rejects it
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthClientError>;

    /// Complete a password reset with the emailed token
    ///
    /// # Errors
    /// Returns error if the request fails or the token is rejected
    async fn confirm_password_reset(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthClientError>;

    /// Change the password of the authenticated user
    ///
    /// # Errors
    /// Returns error if the request fails or the current password is wrong
    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthClientError>;

    /// Change the email of the authenticated user
    ///
    /// # Errors
    /// Returns error if the request fails or the backend rejects the change
    async fn change_email(
        &self,
        access_token: &str,
        new_email: &str,
        current_password: &str,
    ) -> Result<(), AuthClientError>;
}

/// Trait for durable session storage
///
/// Abstracts the persisted session record and the guard hint (the
/// pre-mount token copy consulted before the session store is built) to
/// enable testing with in-memory implementations.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Persist the session record
    ///
    /// # Errors
    /// Returns error if storage fails
    async fn store_session(&self, record: &PersistedSession) -> Result<(), String>;

    /// Load the persisted session record
    ///
    /// # Returns
    /// `Ok(None)` when no session is stored
    ///
    /// # Errors
    /// Returns error if the stored record cannot be read or parsed
    async fn load_session(&self) -> Result<Option<PersistedSession>, String>;

    /// Delete the persisted session record; succeeds if nothing is stored
    ///
    /// # Errors
    /// Returns error if deletion fails
    async fn clear_session(&self) -> Result<(), String>;

    /// Write the guard hint for the given access token
    ///
    /// # Errors
    /// Returns error if storage fails
    async fn write_guard_hint(&self, access_token: &str, max_age: Duration) -> Result<(), String>;

    /// Read the guard hint, if present and not past its max-age
    async fn read_guard_hint(&self) -> Option<String>;

    /// Delete the guard hint; succeeds if nothing is stored
    ///
    /// # Errors
    /// Returns error if deletion fails
    async fn clear_guard_hint(&self) -> Result<(), String>;
}
