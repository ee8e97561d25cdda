//! File-backed session persistence
//!
//! Stores the session record as one entry per key under a directory:
//! `accessToken`, `refreshToken`, and `user` (JSON identity), plus a
//! separate `guard_hint` entry holding the access token with an absolute
//! expiry. The guard hint is the analog of the pre-mount auth cookie: it
//! can be read cheaply before the session store exists, and it is rewritten
//! from the live session on every token change rather than aging on its own.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::SessionStorage;
use super::types::PersistedSession;

const ACCESS_TOKEN_KEY: &str = "accessToken";
const REFRESH_TOKEN_KEY: &str = "refreshToken";
const USER_KEY: &str = "user";
const GUARD_HINT_KEY: &str = "guard_hint";

/// Error type for session storage operations
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem operation failed
    Io(String),

    /// Stored value could not be serialized or parsed
    Serde(String),

    /// No value stored under the requested key
    NotFound,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "Storage I/O error: {msg}"),
            Self::Serde(msg) => write!(f, "Stored session is unreadable: {msg}"),
            Self::NotFound => write!(f, "No stored value"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(err.to_string())
        }
    }
}

/// Guard-hint payload: token plus absolute expiry (unix seconds)
#[derive(Debug, Serialize, Deserialize)]
struct GuardHint {
    token: String,
    expires_at: i64,
}

/// Durable session storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Create a storage handle rooted at `dir`; the directory is created
    /// lazily on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of this storage
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn read_key(&self, key: &str) -> Result<String, StorageError> {
        Ok(std::fs::read_to_string(self.entry_path(key))?)
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.entry_path(key), value)?;
        Ok(())
    }

    fn remove_key(&self, key: &str) {
        // Idempotent: a missing entry is already the desired state
        let _ = std::fs::remove_file(self.entry_path(key));
    }

    /// Persist the session record
    ///
    /// # Errors
    /// Returns error if any entry cannot be written
    pub fn store_session(&self, record: &PersistedSession) -> Result<(), StorageError> {
        debug!(dir = %self.dir.display(), "storing session record");

        self.write_key(ACCESS_TOKEN_KEY, &record.access_token)?;
        match &record.refresh_token {
            Some(refresh) => self.write_key(REFRESH_TOKEN_KEY, refresh)?,
            None => self.remove_key(REFRESH_TOKEN_KEY),
        }

        let user =
            serde_json::to_string(&record.user).map_err(|e| StorageError::Serde(e.to_string()))?;
        self.write_key(USER_KEY, &user)?;

        Ok(())
    }

    /// Load the persisted session record
    ///
    /// Returns `Ok(None)` when either the access token or the user entry is
    /// absent (both are required for a usable session).
    ///
    /// # Errors
    /// Returns error if the stored user identity cannot be parsed
    pub fn load_session(&self) -> Result<Option<PersistedSession>, StorageError> {
        let access_token = match self.read_key(ACCESS_TOKEN_KEY) {
            Ok(token) => token,
            Err(StorageError::NotFound) => return Ok(None),
            Err(other) => return Err(other),
        };

        let user_raw = match self.read_key(USER_KEY) {
            Ok(raw) => raw,
            Err(StorageError::NotFound) => return Ok(None),
            Err(other) => return Err(other),
        };
        let user = serde_json::from_str(&user_raw).map_err(|e| StorageError::Serde(e.to_string()))?;

        let refresh_token = match self.read_key(REFRESH_TOKEN_KEY) {
            Ok(token) => Some(token),
            Err(StorageError::NotFound) => None,
            Err(other) => return Err(other),
        };

        Ok(Some(PersistedSession { access_token, refresh_token, user }))
    }

    /// Delete the session record; missing entries are fine
    pub fn clear_session(&self) {
        debug!(dir = %self.dir.display(), "clearing session record");

        self.remove_key(ACCESS_TOKEN_KEY);
        self.remove_key(REFRESH_TOKEN_KEY);
        self.remove_key(USER_KEY);
    }

    /// Write the guard hint for the given access token
    ///
    /// # Errors
    /// Returns error if the hint cannot be written
    pub fn write_guard_hint(
        &self,
        access_token: &str,
        max_age: Duration,
    ) -> Result<(), StorageError> {
        let hint = GuardHint {
            token: access_token.to_string(),
            expires_at: Utc::now().timestamp() + max_age.as_secs() as i64,
        };
        let encoded =
            serde_json::to_string(&hint).map_err(|e| StorageError::Serde(e.to_string()))?;
        self.write_key(GUARD_HINT_KEY, &encoded)
    }

    /// Read the guard hint, if present and not past its max-age
    ///
    /// Any unreadable or expired hint reads as absent.
    #[must_use]
    pub fn read_guard_hint(&self) -> Option<String> {
        let raw = self.read_key(GUARD_HINT_KEY).ok()?;
        let hint: GuardHint = serde_json::from_str(&raw).ok()?;
        (hint.expires_at > Utc::now().timestamp()).then_some(hint.token)
    }

    /// Delete the guard hint; missing entries are fine
    pub fn clear_guard_hint(&self) {
        self.remove_key(GUARD_HINT_KEY);
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn store_session(&self, record: &PersistedSession) -> Result<(), String> {
        self.store_session(record).map_err(|e| e.to_string())
    }

    async fn load_session(&self) -> Result<Option<PersistedSession>, String> {
        self.load_session().map_err(|e| e.to_string())
    }

    async fn clear_session(&self) -> Result<(), String> {
        self.clear_session();
        Ok(())
    }

    async fn write_guard_hint(&self, access_token: &str, max_age: Duration) -> Result<(), String> {
        self.write_guard_hint(access_token, max_age).map_err(|e| e.to_string())
    }

    async fn read_guard_hint(&self) -> Option<String> {
        self.read_guard_hint()
    }

    async fn clear_guard_hint(&self) -> Result<(), String> {
        self.clear_guard_hint();
        Ok(())
    }
}
