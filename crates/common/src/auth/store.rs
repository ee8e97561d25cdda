//! Session store: the single authority for "who is logged in"
//!
//! Owns the authenticated-user identity and the token pair, persists them
//! across restarts, and exposes every identity-mutating operation. UI layers
//! only read snapshots and invoke operations; they never mutate session
//! fields directly.
//!
//! Invariant: the user identity and the access token are set and cleared
//! together. A failed refresh never leaves a stale access token in place;
//! it tears the whole session down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dentnotion_domain::UserIdentity;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::client::{AuthClient, AuthClientError};
use super::storage::FileSessionStorage;
use super::traits::{AuthApi, SessionStorage};
use super::types::{PersistedSession, SessionTokens};

/// Error type for session operations
///
/// Operations never panic or leak transport errors; every failure is
/// reported through this type and the UI decides how to display it.
#[derive(Debug)]
pub enum SessionError {
    /// Backend rejected the operation; carries the server-provided text
    Rejected(String),

    /// Transport-level failure (timeout, unreachable backend)
    Network(String),

    /// Success response could not be parsed
    Malformed(String),

    /// Token refresh failed; the session has been torn down
    RefreshFailed(String),

    /// Operation requires an authenticated session
    NotAuthenticated,

    /// No refresh token available
    NoRefreshToken,

    /// Durable storage failed
    Storage(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(msg) => write!(f, "{msg}"),
            Self::Network(msg) => write!(f, "{msg}"),
            Self::Malformed(msg) => write!(f, "Invalid response from server: {msg}"),
            Self::RefreshFailed(msg) => write!(f, "Token refresh failed: {msg}"),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
            Self::Storage(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<AuthClientError> for SessionError {
    fn from(err: AuthClientError) -> Self {
        match err {
            AuthClientError::Server { message, .. } => Self::Rejected(message),
            AuthClientError::RequestFailed(_) => Self::Network(err.to_string()),
            AuthClientError::Parse(msg) => Self::Malformed(msg),
            AuthClientError::NoRefreshToken => Self::NoRefreshToken,
        }
    }
}

/// Lifecycle phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Before the one-time restore has completed
    Unknown,
    /// No signed-in user
    Anonymous,
    /// User identity and access token present
    Authenticated,
}

/// Read-only view of the session for guards and UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub user: Option<UserIdentity>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    /// Whether a user is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

#[derive(Debug, Default)]
struct SessionState {
    restored: bool,
    user: Option<UserIdentity>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    last_error: Option<String>,
}

impl SessionState {
    fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    fn phase(&self) -> SessionPhase {
        if !self.restored {
            SessionPhase::Unknown
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}

/// Session store with durable persistence
///
/// Generic over the auth transport and the storage backend so tests can
/// substitute scripted implementations; production code uses the defaults.
pub struct SessionStore<C = AuthClient, S = FileSessionStorage>
where
    C: AuthApi + 'static,
    S: SessionStorage + 'static,
{
    auth: Arc<C>,
    storage: Arc<S>,
    state: Arc<RwLock<SessionState>>,
    loading: Arc<AtomicBool>,
    guard_hint_max_age: Duration,
    refresh_lock: Arc<Mutex<()>>,
}

impl<C, S> SessionStore<C, S>
where
    C: AuthApi + 'static,
    S: SessionStorage + 'static,
{
    /// Create a new session store
    ///
    /// The store starts in the `Unknown` phase with `is_loading` set;
    /// call [`Self::restore_session`] once at startup.
    ///
    /// # Arguments
    /// * `auth` - Transport for the identity endpoints
    /// * `storage` - Durable session storage
    /// * `guard_hint_max_age` - Upper bound on guard-hint validity; the hint
    ///   itself is rewritten on every token change
    #[must_use]
    pub fn new(auth: C, storage: Arc<S>, guard_hint_max_age: Duration) -> Self {
        Self {
            auth: Arc::new(auth),
            storage,
            state: Arc::new(RwLock::new(SessionState::default())),
            loading: Arc::new(AtomicBool::new(true)),
            guard_hint_max_age,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Restore the session from durable storage
    ///
    /// Runs once at startup and issues no network call. Unreadable or
    /// missing stored data means "no session", never a failure; the store
    /// always leaves the `Unknown` phase and clears `is_loading`.
    ///
    /// # Returns
    /// `true` if a stored session was restored
    pub async fn restore_session(&self) -> bool {
        let loaded = match self.storage.load_session().await {
            Ok(Some(record)) => {
                let mut state = self.state.write().await;
                state.user = Some(record.user);
                state.access_token = Some(record.access_token);
                state.refresh_token = record.refresh_token;
                info!("session restored from storage");
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "failed to restore session; starting anonymous");
                false
            }
        };

        self.state.write().await.restored = true;
        self.loading.store(false, Ordering::SeqCst);
        loaded
    }

    /// Register a new account and open a session
    ///
    /// # Errors
    /// Returns the server-provided error text on rejection; the session
    /// stays anonymous on any failure
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserIdentity, SessionError> {
        self.begin_operation().await;
        let result = async {
            let grant = self.auth.signup(email, password, full_name).await?;
            let identity = grant.identity();
            self.persist_authenticated(identity.clone(), grant.tokens()).await?;
            info!(user_id = %identity.user_id, "signup successful");
            Ok(identity)
        }
        .await;
        self.finish_operation(&result).await;
        result
    }

    /// Authenticate existing credentials and open a session
    ///
    /// # Errors
    /// Returns the server-provided error text on rejection; the session
    /// stays anonymous on any failure
    pub async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, SessionError> {
        self.begin_operation().await;
        let result = async {
            let grant = self.auth.login(email, password).await?;
            let identity = grant.identity();
            self.persist_authenticated(identity.clone(), grant.tokens()).await?;
            info!(user_id = %identity.user_id, "login successful");
            Ok(identity)
        }
        .await;
        self.finish_operation(&result).await;
        result
    }

    /// Exchange the stored refresh token for a rotated token pair
    ///
    /// Fails immediately without a network call when no refresh token is
    /// held. Concurrent calls are de-duplicated: a caller that finds the
    /// token already rotated while it waited returns success without a
    /// second exchange. On failure the whole session is torn down; a
    /// stale access token is never left in place.
    ///
    /// # Errors
    /// Returns `NoRefreshToken` or `RefreshFailed`
    pub async fn refresh_access_token(&self) -> Result<(), SessionError> {
        let observed = {
            let state = self.state.read().await;
            state.refresh_token.clone().ok_or(SessionError::NoRefreshToken)?
        };

        let _in_flight = self.refresh_lock.lock().await;

        let (user, current) = {
            let state = self.state.read().await;
            match (&state.user, &state.refresh_token) {
                (_, None) => return Err(SessionError::NoRefreshToken),
                (_, Some(token)) if *token != observed => return Ok(()),
                (None, Some(_)) => return Err(SessionError::NotAuthenticated),
                (Some(user), Some(token)) => (user.clone(), token.clone()),
            }
        };

        match self.auth.refresh(&current).await {
            Ok(grant) => {
                let tokens = SessionTokens {
                    access_token: grant.access_token,
                    refresh_token: grant.refresh_token,
                };
                self.persist_authenticated(user, tokens).await?;
                info!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed; logging out");
                self.logout().await;
                Err(SessionError::RefreshFailed(err.to_string()))
            }
        }
    }

    /// End the session
    ///
    /// Best-effort notifies the backend, then unconditionally clears
    /// storage, the guard hint, and the in-memory state. The local cleanup
    /// always succeeds, which is why this returns nothing.
    pub async fn logout(&self) {
        self.loading.store(true, Ordering::SeqCst);

        let access_token = self.state.read().await.access_token.clone();
        if let Some(token) = access_token {
            if let Err(err) = self.auth.logout(&token).await {
                warn!(error = %err, "logout notification failed; clearing local session anyway");
            }
        }

        if let Err(err) = self.storage.clear_session().await {
            warn!(error = %err, "failed to clear stored session");
        }
        if let Err(err) = self.storage.clear_guard_hint().await {
            warn!(error = %err, "failed to clear guard hint");
        }

        {
            let mut state = self.state.write().await;
            state.user = None;
            state.access_token = None;
            state.refresh_token = None;
            state.last_error = None;
        }

        self.loading.store(false, Ordering::SeqCst);
        info!("logged out");
    }

    /// Request a password-reset email; does not touch session state
    ///
    /// # Errors
    /// Returns the server-provided error text on rejection
    pub async fn request_password_reset(&self, email: &str) -> Result<(), SessionError> {
        self.begin_operation().await;
        let result = self.auth.request_password_reset(email).await.map_err(SessionError::from);
        self.finish_operation(&result).await;
        result
    }

    /// Complete a password reset; does not touch session state
    ///
    /// # Errors
    /// Returns the server-provided error text on rejection
    pub async fn confirm_password_reset(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        self.begin_operation().await;
        let result = self
            .auth
            .confirm_password_reset(email, token, new_password)
            .await
            .map_err(SessionError::from);
        self.finish_operation(&result).await;
        result
    }

    /// Change the password of the signed-in user
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a session, or the server-provided
    /// error text on rejection
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        self.begin_operation().await;
        let result = async {
            let token = self
                .state
                .read()
                .await
                .access_token
                .clone()
                .ok_or(SessionError::NotAuthenticated)?;
            self.auth.change_password(&token, current_password, new_password).await?;
            Ok(())
        }
        .await;
        self.finish_operation(&result).await;
        result
    }

    /// Change the email of the signed-in user
    ///
    /// On success the local identity is updated optimistically (the user
    /// still confirms the change out of band) and re-persisted.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a session, or the server-provided
    /// error text on rejection
    pub async fn change_email(
        &self,
        new_email: &str,
        current_password: &str,
    ) -> Result<(), SessionError> {
        self.begin_operation().await;
        let result = async {
            let token = self
                .state
                .read()
                .await
                .access_token
                .clone()
                .ok_or(SessionError::NotAuthenticated)?;
            self.auth.change_email(&token, new_email, current_password).await?;

            let record = {
                let mut state = self.state.write().await;
                if let Some(user) = state.user.as_mut() {
                    user.email = new_email.to_string();
                }
                match (&state.user, &state.access_token) {
                    (Some(user), Some(access)) => Some(PersistedSession {
                        access_token: access.clone(),
                        refresh_token: state.refresh_token.clone(),
                        user: user.clone(),
                    }),
                    _ => None,
                }
            };
            if let Some(record) = record {
                if let Err(err) = self.storage.store_session(&record).await {
                    warn!(error = %err, "failed to re-persist session after email change");
                }
            }
            Ok(())
        }
        .await;
        self.finish_operation(&result).await;
        result
    }

    /// Whether a user is signed in
    #[must_use]
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Current access token, if any
    #[must_use]
    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    /// Current user identity, if any
    #[must_use]
    pub async fn user(&self) -> Option<UserIdentity> {
        self.state.read().await.user.clone()
    }

    /// Whether a restore or auth operation is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Message of the most recent failed operation, if any
    #[must_use]
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Read-only view for guards and UI
    #[must_use]
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            phase: state.phase(),
            user: state.user.clone(),
            is_loading: self.is_loading(),
            last_error: state.last_error.clone(),
        }
    }

    /// Persist a fresh grant, rewrite the guard hint, and update the
    /// in-memory state: identity and tokens together, never one without
    /// the other.
    async fn persist_authenticated(
        &self,
        user: UserIdentity,
        tokens: SessionTokens,
    ) -> Result<(), SessionError> {
        let record = PersistedSession {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            user: user.clone(),
        };
        self.storage.store_session(&record).await.map_err(SessionError::Storage)?;

        if let Err(err) =
            self.storage.write_guard_hint(&tokens.access_token, self.guard_hint_max_age).await
        {
            warn!(error = %err, "failed to write guard hint");
        }

        let mut state = self.state.write().await;
        state.user = Some(user);
        state.access_token = Some(tokens.access_token);
        state.refresh_token = tokens.refresh_token;
        Ok(())
    }

    async fn begin_operation(&self) {
        self.loading.store(true, Ordering::SeqCst);
        self.state.write().await.last_error = None;
    }

    async fn finish_operation<T>(&self, result: &Result<T, SessionError>) {
        if let Err(err) = result {
            self.state.write().await.last_error = Some(err.to_string());
        }
        self.loading.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::store.
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::types::{AuthGrant, RefreshGrant};
    use crate::testing::MemorySessionStorage;

    /// Scripted auth transport; endpoints not configured for a test answer
    /// with a 500 so misuse is loud.
    #[derive(Default)]
    struct ScriptedAuth {
        login_grant: Option<AuthGrant>,
        login_reject: Option<(u16, String)>,
        signup_grant: Option<AuthGrant>,
        refresh_grant: Option<RefreshGrant>,
        refresh_reject: Option<(u16, String)>,
        refresh_delay: Option<Duration>,
        logout_reject: Option<(u16, String)>,
        refresh_calls: AtomicUsize,
        logout_calls: AtomicUsize,
    }

    impl ScriptedAuth {
        fn not_scripted() -> AuthClientError {
            AuthClientError::Server { status: 500, message: "endpoint not scripted".to_string() }
        }

        fn reject((status, message): &(u16, String)) -> AuthClientError {
            AuthClientError::Server { status: *status, message: message.clone() }
        }
    }

    #[async_trait]
    impl AuthApi for ScriptedAuth {
        async fn signup(
            &self,
            _email: &str,
            _password: &str,
            _full_name: Option<&str>,
        ) -> Result<AuthGrant, AuthClientError> {
            self.signup_grant.clone().ok_or_else(Self::not_scripted)
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<AuthGrant, AuthClientError> {
            if let Some(reject) = &self.login_reject {
                return Err(Self::reject(reject));
            }
            self.login_grant.clone().ok_or_else(Self::not_scripted)
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<RefreshGrant, AuthClientError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.refresh_delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(reject) = &self.refresh_reject {
                return Err(Self::reject(reject));
            }
            self.refresh_grant.clone().ok_or_else(Self::not_scripted)
        }

        async fn logout(&self, _access_token: &str) -> Result<(), AuthClientError> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            match &self.logout_reject {
                Some(reject) => Err(Self::reject(reject)),
                None => Ok(()),
            }
        }

        async fn request_password_reset(&self, _email: &str) -> Result<(), AuthClientError> {
            Ok(())
        }

        async fn confirm_password_reset(
            &self,
            _email: &str,
            _token: &str,
            _new_password: &str,
        ) -> Result<(), AuthClientError> {
            Ok(())
        }

        async fn change_password(
            &self,
            _access_token: &str,
            _current_password: &str,
            _new_password: &str,
        ) -> Result<(), AuthClientError> {
            Ok(())
        }

        async fn change_email(
            &self,
            _access_token: &str,
            _new_email: &str,
            _current_password: &str,
        ) -> Result<(), AuthClientError> {
            Ok(())
        }
    }

    fn grant() -> AuthGrant {
        AuthGrant {
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            user_id: "u-1".to_string(),
            email: "dentist@clinic.example".to_string(),
            full_name: Some("Dr. Haddad".to_string()),
        }
    }

    fn store_with(auth: ScriptedAuth) -> SessionStore<ScriptedAuth, MemorySessionStorage> {
        SessionStore::new(auth, Arc::new(MemorySessionStorage::new()), Duration::from_secs(3600))
    }

    /// Validates the phase transitions around the one-time restore.
    ///
    /// Assertions:
    /// - Confirms the phase is `Unknown` (and loading) before restore.
    /// - Confirms an empty storage restores to `Anonymous`, not loading.
    #[tokio::test]
    async fn test_restore_with_empty_storage() {
        let store = store_with(ScriptedAuth::default());

        let before = store.snapshot().await;
        assert_eq!(before.phase, SessionPhase::Unknown);
        assert!(before.is_loading);

        assert!(!store.restore_session().await);

        let after = store.snapshot().await;
        assert_eq!(after.phase, SessionPhase::Anonymous);
        assert!(!after.is_loading);
    }

    /// Validates restore with a populated storage.
    ///
    /// Assertions:
    /// - Confirms the session becomes `Authenticated` with the stored
    ///   identity and tokens.
    #[tokio::test]
    async fn test_restore_with_stored_session() {
        let storage = Arc::new(MemorySessionStorage::new());
        storage
            .seed(PersistedSession {
                access_token: "access-1".to_string(),
                refresh_token: Some("refresh-1".to_string()),
                user: grant().identity(),
            })
            .await;

        let store = SessionStore::new(
            ScriptedAuth::default(),
            storage,
            Duration::from_secs(3600),
        );

        assert!(store.restore_session().await);
        assert!(store.is_authenticated().await);
        assert_eq!(store.access_token().await, Some("access-1".to_string()));
    }

    /// Validates restore treats unreadable storage as "no session".
    ///
    /// Assertions:
    /// - Confirms restore completes with the session `Anonymous` and
    ///   loading cleared, without an error.
    #[tokio::test]
    async fn test_restore_with_unreadable_storage() {
        let storage = Arc::new(MemorySessionStorage::new());
        storage.poison().await;

        let store = SessionStore::new(
            ScriptedAuth::default(),
            storage,
            Duration::from_secs(3600),
        );

        assert!(!store.restore_session().await);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.phase, SessionPhase::Anonymous);
        assert!(!snapshot.is_loading);
    }

    /// Validates the login success path.
    ///
    /// Assertions:
    /// - Confirms identity and tokens are set together.
    /// - Confirms the record and the guard hint are persisted.
    #[tokio::test]
    async fn test_login_success() {
        let storage = Arc::new(MemorySessionStorage::new());
        let auth = ScriptedAuth { login_grant: Some(grant()), ..Default::default() };
        let store = SessionStore::new(auth, storage.clone(), Duration::from_secs(3600));
        store.restore_session().await;

        let identity = store.login("dentist@clinic.example", "hunter2").await.unwrap();
        assert_eq!(identity.user_id, "u-1");

        assert!(store.is_authenticated().await);
        assert_eq!(store.access_token().await, Some("access-1".to_string()));

        let stored = storage.load_session().await.unwrap().unwrap();
        assert_eq!(stored.access_token, "access-1");
        assert_eq!(storage.read_guard_hint().await, Some("access-1".to_string()));
    }

    /// Validates the login rejection path.
    ///
    /// Assertions:
    /// - Confirms the error text is exactly the server-provided message.
    /// - Confirms the session stays `Anonymous` and the error is recorded.
    #[tokio::test]
    async fn test_login_rejection() {
        let auth = ScriptedAuth {
            login_reject: Some((401, "Invalid credentials".to_string())),
            ..Default::default()
        };
        let store = store_with(auth);
        store.restore_session().await;

        let err = store.login("dentist@clinic.example", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.phase, SessionPhase::Anonymous);
        assert_eq!(snapshot.last_error, Some("Invalid credentials".to_string()));
        assert!(!snapshot.is_loading);
    }

    /// Validates the authentication invariant across every operation here:
    /// `is_authenticated ⇔ user and access token both present`.
    ///
    /// Assertions:
    /// - Confirms the invariant after restore, login, and logout.
    #[tokio::test]
    async fn test_user_and_token_always_move_together() {
        let auth = ScriptedAuth { login_grant: Some(grant()), ..Default::default() };
        let store = store_with(auth);

        store.restore_session().await;
        assert_eq!(store.user().await.is_some(), store.access_token().await.is_some());

        store.login("dentist@clinic.example", "hunter2").await.unwrap();
        assert!(store.user().await.is_some() && store.access_token().await.is_some());

        store.logout().await;
        assert!(store.user().await.is_none() && store.access_token().await.is_none());
    }

    /// Validates `refresh_access_token` with no stored refresh token.
    ///
    /// Assertions:
    /// - Ensures `matches!(result, Err(SessionError::NoRefreshToken))`
    ///   evaluates to true.
    /// - Confirms no network call was issued.
    #[tokio::test]
    async fn test_refresh_without_token_issues_no_call() {
        let auth = ScriptedAuth::default();
        let store = store_with(auth);
        store.restore_session().await;

        let result = store.refresh_access_token().await;
        assert!(matches!(result, Err(SessionError::NoRefreshToken)));
        assert_eq!(store.auth.refresh_calls.load(Ordering::SeqCst), 0);
    }

    /// Validates the refresh success path rotates both tokens.
    ///
    /// Assertions:
    /// - Confirms state and storage carry the rotated pair.
    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let storage = Arc::new(MemorySessionStorage::new());
        let auth = ScriptedAuth {
            login_grant: Some(grant()),
            refresh_grant: Some(RefreshGrant {
                access_token: "access-2".to_string(),
                refresh_token: Some("refresh-2".to_string()),
            }),
            ..Default::default()
        };
        let store = SessionStore::new(auth, storage.clone(), Duration::from_secs(3600));
        store.restore_session().await;
        store.login("dentist@clinic.example", "hunter2").await.unwrap();

        store.refresh_access_token().await.unwrap();

        assert_eq!(store.access_token().await, Some("access-2".to_string()));
        let stored = storage.load_session().await.unwrap().unwrap();
        assert_eq!(stored.refresh_token, Some("refresh-2".to_string()));
        assert_eq!(storage.read_guard_hint().await, Some("access-2".to_string()));
    }

    /// Validates a failed refresh tears the session down.
    ///
    /// Assertions:
    /// - Ensures the result is `RefreshFailed`.
    /// - Confirms `is_authenticated` is false afterwards and storage is
    ///   cleared.
    #[tokio::test]
    async fn test_failed_refresh_logs_out() {
        let storage = Arc::new(MemorySessionStorage::new());
        let auth = ScriptedAuth {
            login_grant: Some(grant()),
            refresh_reject: Some((401, "Token is invalid or expired".to_string())),
            ..Default::default()
        };
        let store = SessionStore::new(auth, storage.clone(), Duration::from_secs(3600));
        store.restore_session().await;
        store.login("dentist@clinic.example", "hunter2").await.unwrap();

        let result = store.refresh_access_token().await;
        assert!(matches!(result, Err(SessionError::RefreshFailed(_))));

        assert!(!store.is_authenticated().await);
        assert_eq!(storage.load_session().await.unwrap(), None);
        assert_eq!(storage.read_guard_hint().await, None);
    }

    /// Validates logout clears everything even when the backend rejects the
    /// notification.
    ///
    /// Assertions:
    /// - Confirms the remote call was attempted once.
    /// - Confirms state, storage, and guard hint are all cleared.
    #[tokio::test]
    async fn test_logout_clears_despite_remote_failure() {
        let storage = Arc::new(MemorySessionStorage::new());
        let auth = ScriptedAuth {
            login_grant: Some(grant()),
            logout_reject: Some((500, "Internal server error".to_string())),
            ..Default::default()
        };
        let store = SessionStore::new(auth, storage.clone(), Duration::from_secs(3600));
        store.restore_session().await;
        store.login("dentist@clinic.example", "hunter2").await.unwrap();

        store.logout().await;

        assert_eq!(store.auth.logout_calls.load(Ordering::SeqCst), 1);
        assert!(!store.is_authenticated().await);
        assert_eq!(storage.load_session().await.unwrap(), None);
        assert_eq!(storage.read_guard_hint().await, None);
        assert_eq!(store.last_error().await, None);
    }

    /// Validates that overlapping refresh calls collapse into one exchange.
    ///
    /// Assertions:
    /// - Confirms both callers succeed.
    /// - Confirms exactly one network exchange was issued.
    #[tokio::test]
    async fn test_concurrent_refresh_is_deduplicated() {
        let auth = ScriptedAuth {
            login_grant: Some(grant()),
            refresh_grant: Some(RefreshGrant {
                access_token: "access-2".to_string(),
                refresh_token: Some("refresh-2".to_string()),
            }),
            refresh_delay: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let store = Arc::new(store_with(auth));
        store.restore_session().await;
        store.login("dentist@clinic.example", "hunter2").await.unwrap();

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.refresh_access_token().await })
        };
        let second = {
            let store = store.clone();
            tokio::spawn(async move { store.refresh_access_token().await })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        // The second caller saw the rotated token and skipped the exchange
        assert_eq!(store.auth.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.access_token().await, Some("access-2".to_string()));
    }

    /// Validates `change_password` without a session.
    ///
    /// Assertions:
    /// - Ensures `matches!(result, Err(SessionError::NotAuthenticated))`
    ///   evaluates to true.
    #[tokio::test]
    async fn test_change_password_requires_session() {
        let store = store_with(ScriptedAuth::default());
        store.restore_session().await;

        let result = store.change_password("old", "new").await;
        assert!(matches!(result, Err(SessionError::NotAuthenticated)));
    }

    /// Validates the optimistic identity update on email change.
    ///
    /// Assertions:
    /// - Confirms the in-memory identity carries the new email.
    /// - Confirms the persisted record was rewritten.
    #[tokio::test]
    async fn test_change_email_updates_identity() {
        let storage = Arc::new(MemorySessionStorage::new());
        let auth = ScriptedAuth { login_grant: Some(grant()), ..Default::default() };
        let store = SessionStore::new(auth, storage.clone(), Duration::from_secs(3600));
        store.restore_session().await;
        store.login("dentist@clinic.example", "hunter2").await.unwrap();

        store.change_email("new@clinic.example", "hunter2").await.unwrap();

        assert_eq!(store.user().await.unwrap().email, "new@clinic.example");
        let stored = storage.load_session().await.unwrap().unwrap();
        assert_eq!(stored.user.email, "new@clinic.example");
    }
}
