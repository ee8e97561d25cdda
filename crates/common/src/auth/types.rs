//! Session token and wire types
//!
//! Defines the in-memory token pair, the durable session record, and the
//! deserialization targets for the identity endpoints' response envelopes.

use dentnotion_domain::UserIdentity;
use serde::{Deserialize, Serialize};

/// Access/refresh token pair held by an authenticated session
///
/// The refresh token is optional: the session can operate on the access
/// token alone, it just cannot be renewed without re-authenticating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Opaque bearer credential attached to authenticated calls
    pub access_token: String,

    /// Single-use credential consumed to mint a new token pair
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Durable encoding of an authenticated session
///
/// Written to client-side storage on every mutation that changes the token
/// pair or the identity; read back exactly once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: UserIdentity,
}

/// Success envelope used by every identity endpoint: `{"data": …, "message": …}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub data: Option<T>,
    #[allow(dead_code)]
    pub message: Option<String>,
}

/// Token grant returned by the signup and login endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user_id: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl AuthGrant {
    /// Identity carried by this grant; an empty `full_name` (the backend
    /// echoes the signup default) collapses to `None`.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.as_deref().filter(|name| !name.is_empty()).map(String::from),
            role: None,
        }
    }

    /// Token pair carried by this grant
    #[must_use]
    pub fn tokens(&self) -> SessionTokens {
        SessionTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Rotated token pair returned by the refresh endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Error envelope produced by the backend: `{"error": …, "detail": …, "error_code": …}`
///
/// Bodies are best-effort: any field may be absent, and the endpoint may
/// return plain text or nothing at all.
#[derive(Debug, Default, Deserialize)]
pub struct ServerErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub detail: Option<serde_json::Value>,
    pub error_code: Option<String>,
}

impl ServerErrorBody {
    /// Best human-readable message in the body, if any
    #[must_use]
    pub fn best_message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        if let Some(detail) = &self.detail {
            return Some(match detail {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            });
        }
        self.message.clone()
    }
}
