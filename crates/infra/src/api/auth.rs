//! Bearer credential provision for API calls
//!
//! Bridges the session store into the API client without coupling the two:
//! the client only knows how to ask for "the current access token".

use async_trait::async_trait;
use dentnotion_common::auth::store::SessionStore;
use dentnotion_common::auth::traits::{AuthApi, SessionStorage};

/// Trait for providing access tokens
///
/// Returns `None` when no user is signed in; the call is then issued
/// without a bearer header. This matches the backend, whose domain CRUD
/// is reachable anonymously while the account endpoints require a token.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Current access token, if a session is open
    async fn access_token(&self) -> Option<String>;
}

#[async_trait]
impl<C, S> AccessTokenProvider for SessionStore<C, S>
where
    C: AuthApi + 'static,
    S: SessionStorage + 'static,
{
    async fn access_token(&self) -> Option<String> {
        SessionStore::access_token(self).await
    }
}
