//! HTTP client for the identity endpoints
//!
//! Thin typed wrapper over the backend's `/auth/…` routes:
//! - Signup, login, refresh, logout
//! - Password reset request/confirmation
//! - Password and email changes for the authenticated user
//!
//! Error bodies are read JSON-first with a raw-text fallback; the backend
//! is allowed to answer with plain text or an empty body on any endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use tracing::debug;

use super::traits::AuthApi;
use super::types::{ApiEnvelope, AuthGrant, RefreshGrant, ServerErrorBody};

/// Default timeout for identity-endpoint requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for identity-endpoint operations
#[derive(Debug)]
pub enum AuthClientError {
    /// HTTP request failed (connection, DNS, timeout)
    RequestFailed(reqwest::Error),

    /// Backend answered with a non-2xx status
    Server { status: u16, message: String },

    /// Failed to parse a success response
    Parse(String),

    /// No refresh token available
    NoRefreshToken,
}

impl std::fmt::Display for AuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => {
                if e.is_timeout() {
                    write!(f, "Request timed out. The backend server may be unresponsive or slow.")
                } else {
                    write!(f, "Network error: cannot reach the backend server: {e}")
                }
            }
            Self::Server { message, .. } => write!(f, "{message}"),
            Self::Parse(msg) => write!(f, "Invalid response from server: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
        }
    }
}

impl std::error::Error for AuthClientError {}

impl From<reqwest::Error> for AuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// Typed client for the identity endpoints
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    client: Client,
}

impl AuthClient {
    /// Create a new auth client against the given API base URL
    /// (e.g. "http://localhost:8000/api")
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new auth client with an explicit request timeout
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client =
            Client::builder().timeout(timeout).build().unwrap_or_else(|_| Client::new());
        Self { base_url: base_url.into(), client }
    }

    /// Get the configured base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, AuthClientError> {
        builder.send().await.map_err(AuthClientError::from)
    }

    /// Turn a non-2xx response into a `Server` error, preferring the
    /// backend's structured message and falling back to the raw body text,
    /// then to the caller's generic message.
    async fn read_error(response: Response, fallback: &str) -> AuthClientError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ServerErrorBody>(&text)
            .ok()
            .and_then(|body| body.best_message())
            .or_else(|| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| fallback.to_string());

        AuthClientError::Server { status, message }
    }

    async fn read_data<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, AuthClientError> {
        let envelope: ApiEnvelope<T> =
            response.json().await.map_err(|e| AuthClientError::Parse(e.to_string()))?;
        envelope.data.ok_or_else(|| AuthClientError::Parse("missing data field".to_string()))
    }

    /// Check the response status and discard any success body
    async fn expect_ok(response: Response, fallback: &str) -> Result<(), AuthClientError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::read_error(response, fallback).await)
        }
    }

    /// Register a new account
    ///
    /// # Errors
    /// Returns error if the request fails or the backend rejects the signup
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthGrant, AuthClientError> {
        let url = self.endpoint("/auth/signup/");
        debug!(url = %url, "signup request");

        let body = json!({
            "email": email,
            "password": password,
            "full_name": full_name.unwrap_or(""),
        });

        let response = self.send(self.client.post(&url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response, "Signup failed").await);
        }
        Self::read_data(response).await
    }

    /// Authenticate existing credentials
    ///
    /// # Errors
    /// Returns error if the request fails or the credentials are rejected
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, AuthClientError> {
        let url = self.endpoint("/auth/login/");
        debug!(url = %url, "login request");

        let body = json!({ "email": email, "password": password });

        let response = self.send(self.client.post(&url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response, "Login failed").await);
        }
        Self::read_data(response).await
    }

    /// Exchange a refresh token for a rotated token pair
    ///
    /// An empty token fails immediately without issuing a network call.
    ///
    /// # Errors
    /// Returns error if the token is empty, invalid, or the request fails
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshGrant, AuthClientError> {
        if refresh_token.is_empty() {
            return Err(AuthClientError::NoRefreshToken);
        }

        let url = self.endpoint("/auth/refresh/");
        debug!(url = %url, "token refresh request");

        let body = json!({ "refresh_token": refresh_token });

        let response = self.send(self.client.post(&url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response, "Token refresh failed").await);
        }
        Self::read_data(response).await
    }

    /// Notify the backend that the session is ending (best-effort)
    ///
    /// # Errors
    /// Returns error if the request fails; callers treat this as advisory
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthClientError> {
        let url = self.endpoint("/auth/logout/");
        debug!(url = %url, "logout request");

        let response = self.send(self.client.post(&url).bearer_auth(access_token)).await?;
        Self::expect_ok(response, "Logout failed").await
    }

    /// Request a password-reset email
    ///
    /// # Errors
    /// Returns error if the request fails or the backend rejects it
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthClientError> {
        let url = self.endpoint("/auth/password_reset/");
        debug!(url = %url, "password reset request");

        let body = json!({ "email": email });

        let response = self.send(self.client.post(&url).json(&body)).await?;
        Self::expect_ok(response, "Request failed").await
    }

    /// Complete a password reset with the emailed token
    ///
    /// # Errors
    /// Returns error if the request fails or the token is rejected
    pub async fn confirm_password_reset(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthClientError> {
        let url = self.endpoint("/auth/password_reset_confirm/");
        debug!(url = %url, "password reset confirmation");

        let body = json!({ "email": email, "token": token, "new_password": new_password });

        let response = self.send(self.client.post(&url).json(&body)).await?;
        Self::expect_ok(response, "Reset failed").await
    }

    /// Change the password of the authenticated user
    ///
    /// # Errors
    /// Returns error if the request fails or the current password is wrong
    pub async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthClientError> {
        let url = self.endpoint("/auth/change_password/");
        debug!(url = %url, "change password request");

        let body = json!({ "current_password": current_password, "new_password": new_password });

        let response =
            self.send(self.client.post(&url).bearer_auth(access_token).json(&body)).await?;
        Self::expect_ok(response, "Failed to change password").await
    }

    /// Change the email of the authenticated user
    ///
    /// # Errors
    /// Returns error if the request fails or the backend rejects the change
    pub async fn change_email(
        &self,
        access_token: &str,
        new_email: &str,
        current_password: &str,
    ) -> Result<(), AuthClientError> {
        let url = self.endpoint("/auth/change_email/");
        debug!(url = %url, "change email request");

        let body = json!({ "new_email": new_email, "current_password": current_password });

        let response =
            self.send(self.client.post(&url).bearer_auth(access_token).json(&body)).await?;
        Self::expect_ok(response, "Failed to change email").await
    }
}

// Implement AuthApi for AuthClient
#[async_trait]
impl AuthApi for AuthClient {
    async fn signup(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthGrant, AuthClientError> {
        self.signup(email, password, full_name).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, AuthClientError> {
        self.login(email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshGrant, AuthClientError> {
        self.refresh(refresh_token).await
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthClientError> {
        self.logout(access_token).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthClientError> {
        self.request_password_reset(email).await
    }

    async fn confirm_password_reset(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthClientError> {
        self.confirm_password_reset(email, token, new_password).await
    }

    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthClientError> {
        self.change_password(access_token, current_password, new_password).await
    }

    async fn change_email(
        &self,
        access_token: &str,
        new_email: &str,
        current_password: &str,
    ) -> Result<(), AuthClientError> {
        self.change_email(access_token, new_email, current_password).await
    }
}
