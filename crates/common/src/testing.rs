//! Testing utilities
//!
//! In-memory stand-ins for the storage seam, used by this crate's own tests
//! and exposed to downstream crates through the `test-utils` feature.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::auth::traits::SessionStorage;
use crate::auth::types::PersistedSession;

#[derive(Debug, Default)]
struct MemoryState {
    session: Option<PersistedSession>,
    guard_hint: Option<(String, i64)>,
    poisoned: bool,
}

/// In-memory session storage for deterministic tests
///
/// Mirrors the behavior of the file-backed storage, including the
/// guard-hint expiry check. `poison` makes every load fail, standing in
/// for unreadable on-disk state.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    state: Mutex<MemoryState>,
}

impl MemorySessionStorage {
    /// Create an empty in-memory storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the stored session record
    pub async fn seed(&self, record: PersistedSession) {
        self.state.lock().await.session = Some(record);
    }

    /// Make every subsequent `load_session` fail
    pub async fn poison(&self) {
        self.state.lock().await.poisoned = true;
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn store_session(&self, record: &PersistedSession) -> Result<(), String> {
        self.state.lock().await.session = Some(record.clone());
        Ok(())
    }

    async fn load_session(&self) -> Result<Option<PersistedSession>, String> {
        let state = self.state.lock().await;
        if state.poisoned {
            return Err("stored session is unreadable".to_string());
        }
        Ok(state.session.clone())
    }

    async fn clear_session(&self) -> Result<(), String> {
        self.state.lock().await.session = None;
        Ok(())
    }

    async fn write_guard_hint(&self, access_token: &str, max_age: Duration) -> Result<(), String> {
        let expires_at = Utc::now().timestamp() + max_age.as_secs() as i64;
        self.state.lock().await.guard_hint = Some((access_token.to_string(), expires_at));
        Ok(())
    }

    async fn read_guard_hint(&self) -> Option<String> {
        let state = self.state.lock().await;
        state
            .guard_hint
            .as_ref()
            .filter(|(_, expires_at)| *expires_at > Utc::now().timestamp())
            .map(|(token, _)| token.clone())
    }

    async fn clear_guard_hint(&self) -> Result<(), String> {
        self.state.lock().await.guard_hint = None;
        Ok(())
    }
}
