//! Auth store.
//!
//! Owns the session (token and profile), keeps the gateway's bearer token
//! in step with it, and persists the token so a restart can re-hydrate the
//! profile with [`AuthStore::initialize_auth`].

use std::sync::Arc;

use parking_lot::RwLock;
use studhelper_client::{ApiClient, FirebaseLoginRequest, RegisterRequest, TokenResponse};
use studhelper_types::{ProfileUpdate, Session, UserProfile};
use tokio::sync::watch;

use super::{InFlight, Revision};
use crate::error::{StoreError, StoreResult};
use crate::sequencer::{RequestSequencer, Ticket};
use crate::storage::{KeyValueStore, TOKEN_KEY};

#[derive(Debug, Default)]
struct AuthState {
    session: Session,
    error: Option<String>,
}

/// Session state.
pub struct AuthStore {
    api: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<AuthState>,
    sessions: RequestSequencer,
    in_flight: InFlight,
    revision: Revision,
}

impl AuthStore {
    /// Creates the store, restoring a persisted token.
    ///
    /// A restored token is installed into the gateway, but the session is
    /// not authenticated until [`AuthStore::initialize_auth`] loads the
    /// profile.
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        if token.is_some() {
            tracing::debug!("Restored persisted token");
        }
        api.set_token(token.clone());

        Self {
            api,
            storage,
            state: RwLock::new(AuthState {
                session: Session { token, user: None },
                error: None,
            }),
            sessions: RequestSequencer::new(),
            in_flight: InFlight::default(),
            revision: Revision::new(),
        }
    }

    // ==================== Views ====================

    /// Snapshot of the session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.read().session.clone()
    }

    /// The signed-in user's profile.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().session.user.clone()
    }

    /// The bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.read().session.token.clone()
    }

    /// True when both token and profile are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().session.is_authenticated()
    }

    /// True while any auth action is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Message of the last failed action.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ==================== Actions ====================

    /// Logs in with email and password.
    ///
    /// When the token response carries no profile, the profile is loaded
    /// with the new token. The token reaches the gateway only once the
    /// session is installed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the server's message, or
    /// "Login failed". Returns [`StoreError::Superseded`] when a logout or
    /// a newer login happened while this one was in flight; the session is
    /// then left as that newer action set it.
    pub async fn login(&self, email: &str, password: &str) -> StoreResult<UserProfile> {
        let ticket = self.sessions.issue(());
        let _loading = self.in_flight.enter(&self.revision);

        let response = match self.api.auth().login(email, password).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_for(ticket, StoreError::api(e, "Login failed"))),
        };

        let user = self.complete_login(ticket, response, None, "Login failed").await?;
        tracing::info!(user_id = user.id, "Logged in");
        Ok(user)
    }

    /// Creates an account, then logs in with the same credentials.
    ///
    /// The login response's profile is preferred; the registration response
    /// is used when login returns none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the server's message, or
    /// "Registration failed".
    pub async fn register(&self, req: &RegisterRequest) -> StoreResult<UserProfile> {
        let ticket = self.sessions.issue(());
        let _loading = self.in_flight.enter(&self.revision);

        let registered = match self.api.auth().register(req).await {
            Ok(profile) => profile,
            Err(e) => return Err(self.fail_for(ticket, StoreError::api(e, "Registration failed"))),
        };
        tracing::info!(user_id = registered.id, "Registered account");

        let response = match self.api.auth().login(&req.email, &req.password).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_for(ticket, StoreError::api(e, "Registration failed"))),
        };

        self.complete_login(ticket, response, Some(registered), "Registration failed")
            .await
    }

    /// Signs in with a Firebase ID token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the server's message, or
    /// "Firebase login failed".
    pub async fn firebase_login(&self, req: &FirebaseLoginRequest) -> StoreResult<UserProfile> {
        let ticket = self.sessions.issue(());
        let _loading = self.in_flight.enter(&self.revision);

        let response = match self.api.auth().firebase_login(req).await {
            Ok(response) => response,
            Err(e) => {
                return Err(self.fail_for(ticket, StoreError::api(e, "Firebase login failed")))
            }
        };

        let user = self
            .complete_login(ticket, response, None, "Firebase login failed")
            .await?;
        tracing::info!(user_id = user.id, "Logged in with Firebase");
        Ok(user)
    }

    /// Re-hydrates the profile for a restored token.
    ///
    /// Returns whether a session is now established. Without a token this
    /// is a no-op returning false.
    ///
    /// # Errors
    ///
    /// If the profile cannot be loaded the session is logged out and the
    /// error returned.
    pub async fn initialize_auth(&self) -> StoreResult<bool> {
        let Some(token) = self.token() else {
            return Ok(false);
        };

        let ticket = self.sessions.issue(());
        let _loading = self.in_flight.enter(&self.revision);

        match self.api.auth().me_with_token(&token).await {
            Ok(user) => {
                if !self.sessions.is_latest(&(), ticket) {
                    tracing::debug!(ticket, "Discarding stale profile");
                    return Ok(self.is_authenticated());
                }
                tracing::debug!(user_id = user.id, "Restored session");
                {
                    let mut state = self.state.write();
                    state.session.user = Some(user);
                    state.error = None;
                }
                self.revision.bump();
                Ok(true)
            }
            Err(e) => {
                let err = StoreError::api(e, "Session expired");
                if !self.sessions.is_latest(&(), ticket) {
                    tracing::debug!(ticket, error = %err, "Ignoring stale profile failure");
                    return Err(err);
                }
                tracing::info!(error = %err, "Could not restore session");
                self.logout();
                Err(self.fail(err))
            }
        }
    }

    /// Updates the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the request fails.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> StoreResult<UserProfile> {
        let _loading = self.in_flight.enter(&self.revision);

        let user = match self.api.auth().update_profile(update).await {
            Ok(user) => user,
            Err(e) => return Err(self.fail(StoreError::api(e, "Failed to update profile"))),
        };

        {
            let mut state = self.state.write();
            if state.session.token.is_some() {
                state.session.user = Some(user.clone());
            }
            state.error = None;
        }
        self.revision.bump();
        Ok(user)
    }

    /// Clears the session, the gateway token and the persisted token.
    ///
    /// Session requests still in flight are discarded when they land.
    pub fn logout(&self) {
        self.sessions.reset();
        {
            let mut state = self.state.write();
            state.session.clear();
            state.error = None;
        }
        self.api.set_token(None);

        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::warn!("Failed to remove persisted token: {}", e);
        }

        tracing::info!("Logged out");
        self.revision.bump();
    }

    // ==================== Helpers ====================

    /// Finishes a token exchange: loads the profile if needed, then
    /// installs and persists the session if no newer attempt started.
    ///
    /// The profile request carries the new token explicitly, so the shared
    /// gateway token only changes together with the session.
    async fn complete_login(
        &self,
        ticket: Ticket,
        response: TokenResponse,
        fallback_user: Option<UserProfile>,
        fallback_message: &str,
    ) -> StoreResult<UserProfile> {
        let token = response.access_token;

        let user = match response.user.or(fallback_user) {
            Some(user) => user,
            None => match self.api.auth().me_with_token(&token).await {
                Ok(user) => user,
                Err(e) => return Err(self.fail_for(ticket, StoreError::api(e, fallback_message))),
            },
        };

        {
            // A concurrent logout resets the tickets before taking this
            // lock, so it either discards this login or clears it after.
            let mut state = self.state.write();
            if !self.sessions.is_latest(&(), ticket) {
                tracing::debug!(ticket, "Discarding stale login");
                return Err(StoreError::Superseded);
            }
            state.session = Session {
                token: Some(token.clone()),
                user: Some(user.clone()),
            };
            state.error = None;
            self.api.set_token(Some(token.clone()));

            if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
                tracing::warn!("Failed to persist token: {}", e);
            }
        }

        self.revision.bump();
        Ok(user)
    }

    /// Records the error only if `ticket` is still the newest session
    /// request; a stale failure must not overwrite a newer outcome.
    fn fail_for(&self, ticket: Ticket, err: StoreError) -> StoreError {
        if self.sessions.is_latest(&(), ticket) {
            self.fail(err)
        } else {
            tracing::debug!(ticket, error = %err, "Ignoring stale auth failure");
            err
        }
    }

    fn fail(&self, err: StoreError) -> StoreError {
        tracing::warn!(error = %err, "Auth action failed");
        self.state.write().error = Some(err.message());
        self.revision.bump();
        err
    }
}
