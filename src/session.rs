// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state: who is logged in, if anyone.
//!
//! The session is the single source of truth for authentication status.
//! Routing code subscribes to it instead of polling. A failed token refresh
//! in the request pipeline ends the session through [`SessionManager::revocation_hook`].

use crate::error::ApiError;
use crate::middleware::RevocationHook;
use crate::models::{AuthResponse, UserProfile};
use crate::services::ApiClient;
use crate::store::{TokenKey, TokenStore};
use std::sync::Arc;
use tokio::sync::watch;

/// Authentication status of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup check not finished yet
    Loading,
    /// No user logged in
    Absent,
    /// A user is logged in
    Present(UserProfile),
}

impl SessionState {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Present(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Present(_))
    }
}

/// Owns the session state and the operations that change it.
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionManager {
    /// Create a manager in the `Loading` state; call [`restore`](Self::restore) next.
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            api,
            store,
            state: Arc::new(state),
        }
    }

    /// Hook for the request pipeline: a logged-in session becomes `Absent`
    /// once its credentials have been revoked.
    pub fn revocation_hook(&self) -> RevocationHook {
        let state = Arc::clone(&self.state);
        Box::new(move || {
            let ended = state.send_if_modified(|current| {
                if current.is_authenticated() {
                    *current = SessionState::Absent;
                    true
                } else {
                    false
                }
            });
            if ended {
                tracing::info!("Credentials revoked after failed refresh, session ended");
            }
        })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Loading)
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn set(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    /// Startup check: turn stored credentials back into a session.
    ///
    /// Never fails. Any error clears the stored credentials and leaves the
    /// session `Absent`.
    pub async fn restore(&self) -> SessionState {
        let next = if self.store.read(TokenKey::Access).await.is_none() {
            tracing::info!("No stored credentials, starting logged out");
            SessionState::Absent
        } else {
            match self.api.get_profile().await {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, "Session restored");
                    SessionState::Present(user)
                }
                Err(e) => {
                    tracing::info!(error = %e, "Stored credentials rejected, clearing");
                    self.clear_credentials().await;
                    SessionState::Absent
                }
            }
        };

        self.set(next.clone());
        next
    }

    /// Log in. On failure the state is left as it was and the error is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let auth = self.api.login(email, password).await?;
        Ok(self.establish(auth))
    }

    /// Create an account and log in as it.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let auth = self.api.signup(name, email, password).await?;
        Ok(self.establish(auth))
    }

    fn establish(&self, auth: AuthResponse) -> UserProfile {
        tracing::info!(user_id = %auth.user.id, "Session established");
        self.set(SessionState::Present(auth.user.clone()));
        auth.user
    }

    /// Log out locally, telling the backend if it can be reached.
    ///
    /// The remote call is best-effort: its failure is logged and ignored,
    /// and credentials are cleared regardless.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "Remote logout failed (ignored)");
        }

        self.clear_credentials().await;
        self.set(SessionState::Absent);
        tracing::info!("Logged out");
    }

    /// Re-fetch the profile. A failure ends the session instead of erroring.
    pub async fn refresh_user(&self) -> SessionState {
        let next = match self.api.get_profile().await {
            Ok(user) => SessionState::Present(user),
            Err(e) => {
                tracing::info!(error = %e, "Profile refresh failed, session ended");
                SessionState::Absent
            }
        };

        self.set(next.clone());
        next
    }

    async fn clear_credentials(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "Failed to clear stored credentials");
        }
    }
}
