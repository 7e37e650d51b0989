//! Session manager
//!
//! Owns the signed-in state: access and refresh tokens, the user's email
//! and the last profile fetched. It is the only writer of the three
//! storage keys in [`crate::store`].
//!
//! A `Session` is constructed once at start-up and handed to whatever
//! needs it. Storage failures are logged and swallowed; they never make a
//! session operation fail.

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use laptophub_protocol::{RegisterRequest, RegisterResponse, UserProfile};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::error::{LaptopHubError, Result};
use crate::store::{KeyValueStore, ACCESS_KEY, EMAIL_KEY, REFRESH_KEY, SESSION_KEYS};
use crate::transport::{HttpTransport, Transport};

/// In-memory session fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub access_token: Option<String>,
    /// Stored but never exchanged
    pub refresh_token: Option<String>,
    /// Email of the signed-in user
    pub user: Option<String>,
    pub profile: Option<UserProfile>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

pub struct Session<T: Transport + 'static = HttpTransport, S: KeyValueStore = Box<dyn KeyValueStore>> {
    client: Arc<ApiClient<T>>,
    store: S,
    state: Arc<RwLock<SessionState>>,
    rehydration: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Transport + 'static, S: KeyValueStore> Session<T, S> {
    /// Adopt a previously stored session, if any.
    ///
    /// A stored access token and email make the session authenticated
    /// before this returns. The profile is then fetched in the background
    /// on the current tokio runtime; outside a runtime it is left for
    /// [`refresh_profile`](Self::refresh_profile).
    pub fn initialize(client: Arc<ApiClient<T>>, store: S) -> Self {
        let session = Self {
            client,
            store,
            state: Arc::new(RwLock::new(SessionState::default())),
            rehydration: Mutex::new(None),
        };

        let access = session.read_key(ACCESS_KEY);
        let email = session.read_key(EMAIL_KEY);

        if let (Some(access), Some(email)) = (access, email) {
            debug!(user = %email, "restoring stored session");
            {
                let mut state = session.write_state();
                state.access_token = Some(access.clone());
                state.refresh_token = session.read_key(REFRESH_KEY);
                state.user = Some(email);
            }
            session.spawn_profile_fetch(access);
        }

        session
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Wait for the start-up profile fetch, if one is pending.
    pub async fn settled(&self) {
        let pending = self.lock_rehydration().take();
        if let Some(handle) = pending {
            // A cancelled fetch simply never applied.
            let _ = handle.await;
        }
    }

    /// Cancel the start-up profile fetch. Storage is left alone.
    pub fn teardown(&self) {
        if let Some(handle) = self.lock_rehydration().take() {
            handle.abort();
        }
    }

    /// Sign in and persist the tokens.
    ///
    /// Returns the profile when it could be fetched. A failed profile fetch
    /// does not fail the sign-in.
    /// The email is kept exactly as given.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<UserProfile>> {
        let tokens = self.client.auth().login(email, password).await?;

        self.write_key(ACCESS_KEY, &tokens.access);
        self.write_key(REFRESH_KEY, &tokens.refresh);
        self.write_key(EMAIL_KEY, email);

        *self.write_state() = SessionState {
            access_token: Some(tokens.access.clone()),
            refresh_token: Some(tokens.refresh),
            user: Some(email.to_string()),
            profile: None,
        };
        info!(user = %email, "signed in");

        let profile = self.client.profile().best_effort(&tokens.access).await;
        self.apply_profile(&tokens.access, profile.clone());
        Ok(profile)
    }

    /// Create an account. The caller still has to [`login`](Self::login).
    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse> {
        self.client.auth().register(data).await
    }

    /// Re-fetch the cached profile. Does nothing when signed out.
    pub async fn refresh_profile(&self) -> Result<Option<UserProfile>> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };
        let profile = self.client.profile().get(&token).await?;
        self.apply_profile(&token, profile.clone());
        Ok(profile)
    }

    /// Forget the session in memory and in storage. Safe to call twice.
    pub fn logout(&self) {
        self.teardown();
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                warn!(key, error = %e, "failed to clear stored session key");
            }
        }

        let mut state = self.write_state();
        if let Some(user) = state.user.take() {
            info!(user = %user, "signed out");
        }
        *state = SessionState::default();
    }

    /// Delete the account on the server, then sign out.
    pub async fn delete_account(&self) -> Result<()> {
        let token = self.access_token().ok_or(LaptopHubError::NotAuthenticated)?;
        self.client.profile().delete_account(&token).await?;
        self.logout();
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    pub fn user(&self) -> Option<String> {
        self.read_state().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read_state().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read_state().refresh_token.clone()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read_state().profile.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.read_state().clone()
    }

    fn spawn_profile_fetch(&self, token: String) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("no async runtime; profile fetch deferred");
            return;
        };

        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let handle = runtime.spawn(async move {
            let profile = client.profile().best_effort(&token).await;
            let mut state = state.write().unwrap_or_else(|e| e.into_inner());
            if state.access_token.as_deref() == Some(token.as_str()) {
                state.profile = profile;
            }
        });
        *self.lock_rehydration() = Some(handle);
    }

    /// Cache `profile` unless the session moved on to another token.
    fn apply_profile(&self, token: &str, profile: Option<UserProfile>) {
        let mut state = self.write_state();
        if state.access_token.as_deref() == Some(token) {
            state.profile = profile;
        }
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "failed to read stored session key");
                None
            }
        }
    }

    fn write_key(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "failed to persist session key");
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_rehydration(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.rehydration.lock().unwrap_or_else(|e| e.into_inner())
    }
}
