//! Authenticated user identity
//!
//! Identity payload returned by the auth endpoints and persisted alongside
//! the session tokens.

use serde::{Deserialize, Serialize};

/// Role assumed when the backend does not assign one.
pub const DEFAULT_ROLE: &str = "user";

/// Identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Access role; absent means [`DEFAULT_ROLE`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserIdentity {
    /// Effective role for authorization checks
    #[must_use]
    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_ROLE)
    }
}
