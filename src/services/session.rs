// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state: who is signed in, shared by every query and screen.
//!
//! Handles:
//! - Restoring a persisted session at startup
//! - Token and profile updates after login, registration or profile edits
//! - Logout, including wiping durable storage
//!
//! Transitions are serialized by a dedicated lock and publish a whole new
//! [`SessionState`] at once, so readers observe either the old or the new
//! session and never a token from one with the profile of the other.

use crate::db::{keys, KeyValueStore, StoreError};
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::navigation::{Navigator, Route};
use serde::Serialize;
use std::sync::{Arc, Mutex, RwLock};

/// Bearer token together with the profile it belongs to.
///
/// Fields are private: a credential is replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    token: String,
    profile: UserProfile,
}

impl Credential {
    pub fn new(token: String, profile: UserProfile) -> Self {
        Self { token, profile }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}

/// Authentication state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    /// Token accepted, profile not yet received. Never restored from storage.
    Authenticating { token: String },
    Authenticated(Credential),
}

impl SessionState {
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticating { token } => Some(token),
            SessionState::Authenticated(credential) => Some(credential.token()),
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated(credential) => Some(credential.profile()),
            _ => None,
        }
    }
}

/// Consistent copy of the session for consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user_data: Option<UserProfile>,
}

/// What `restore()` found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Token and profile present and readable
    Restored,
    /// Nothing stored
    NoSession,
    /// Something was stored but unusable; the session starts anonymous
    Discarded(String),
}

/// Process-wide session, constructed once and shared via `Arc`.
pub struct SessionStore {
    state: RwLock<Arc<SessionState>>,
    /// Serializes transitions (storage write + state swap).
    transition: Mutex<()>,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    /// Create an anonymous session backed by `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: RwLock::new(Arc::new(SessionState::Anonymous)),
            transition: Mutex::new(()),
            store,
            navigator,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────────

    /// Current state.
    pub fn state(&self) -> Arc<SessionState> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            token: state.token().map(str::to_string),
            user_data: state.profile().cloned(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state().token().map(str::to_string)
    }

    pub fn user_data(&self) -> Option<UserProfile> {
        self.state().profile().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state(), SessionState::Authenticated(_))
    }

    /// Bearer token for data fetching, or `Unauthorized` when signed out.
    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(AppError::Unauthorized)
    }

    // ─── Transitions ─────────────────────────────────────────────────────────

    fn publish(&self, next: SessionState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(next);
    }

    fn begin(&self) -> std::sync::MutexGuard<'_, ()> {
        self.transition.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Load the persisted session at startup and redirect accordingly.
    ///
    /// Storage problems never escape: they are logged and the session stays
    /// anonymous.
    pub fn restore(&self) -> RestoreOutcome {
        let guard = self.begin();

        let (next, outcome) = match self.load_persisted() {
            Ok(Some(credential)) => (SessionState::Authenticated(credential), RestoreOutcome::Restored),
            Ok(None) => (SessionState::Anonymous, RestoreOutcome::NoSession),
            Err(reason) => {
                tracing::warn!(reason = %reason, "Persisted session unusable, starting anonymous");
                (SessionState::Anonymous, RestoreOutcome::Discarded(reason))
            }
        };

        let authenticated = matches!(next, SessionState::Authenticated(_));
        self.publish(next);
        // The navigator may call back into the session.
        drop(guard);

        if authenticated {
            tracing::info!("Session restored");
            self.navigator.redirect(Route::Home);
        } else {
            self.navigator.redirect(Route::Landing);
        }

        outcome
    }

    fn load_persisted(&self) -> std::result::Result<Option<Credential>, String> {
        let token = self
            .store
            .get(keys::AUTH_TOKEN)
            .map_err(|e| format!("reading {}: {}", keys::AUTH_TOKEN, e))?;
        let user_data = self
            .store
            .get(keys::USER_DATA)
            .map_err(|e| format!("reading {}: {}", keys::USER_DATA, e))?;

        match (token, user_data) {
            (None, None) => Ok(None),
            (Some(token), Some(raw)) if !token.trim().is_empty() => {
                let profile: UserProfile = serde_json::from_str(&raw)
                    .map_err(|e| format!("{} is not a valid profile: {}", keys::USER_DATA, e))?;
                Ok(Some(Credential::new(token, profile)))
            }
            (Some(_), Some(_)) => Err("stored token is empty".to_string()),
            (Some(_), None) => Err(format!("{} missing", keys::USER_DATA)),
            (None, Some(_)) => Err(format!("{} missing", keys::AUTH_TOKEN)),
        }
    }

    /// Store a new bearer token.
    ///
    /// Memory is updated first: if the write fails the session keeps working
    /// for this run and the error is returned so the caller can retry.
    ///
    /// Outside the authenticated state any stored profile belongs to an
    /// earlier session, so it is deleted before the new token is written.
    pub fn set_token(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Validation("token must not be empty".to_string()));
        }

        let _guard = self.begin();

        let (next, keeps_profile) = match &*self.state() {
            SessionState::Authenticated(credential) => (
                SessionState::Authenticated(Credential::new(
                    token.to_string(),
                    credential.profile().clone(),
                )),
                true,
            ),
            _ => (
                SessionState::Authenticating {
                    token: token.to_string(),
                },
                false,
            ),
        };
        self.publish(next);

        let cleared = if keeps_profile {
            Ok(())
        } else {
            self.store.delete(keys::USER_DATA)
        };
        cleared
            .and_then(|_| self.store.set(keys::AUTH_TOKEN, token))
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to persist token");
                AppError::from(e)
            })
    }

    /// Replace the in-memory profile. Does not touch storage; pair with
    /// [`persist_user_data`](Self::persist_user_data) when it should survive
    /// a restart.
    pub fn set_user_data(&self, profile: UserProfile) -> Result<()> {
        let _guard = self.begin();

        let token = match &*self.state() {
            SessionState::Anonymous => return Err(AppError::Unauthorized),
            SessionState::Authenticating { token } => token.clone(),
            SessionState::Authenticated(credential) => credential.token().to_string(),
        };

        self.publish(SessionState::Authenticated(Credential::new(token, profile)));
        Ok(())
    }

    /// Write the current profile to storage.
    pub fn persist_user_data(&self) -> Result<()> {
        let _guard = self.begin();

        let state = self.state();
        let profile = state.profile().ok_or(AppError::Unauthorized)?;
        let json = serde_json::to_string(profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize profile: {}", e)))?;

        self.store.set(keys::USER_DATA, &json).map_err(|e| {
            tracing::warn!(error = %e, "Failed to persist user data");
            AppError::from(e)
        })
    }

    /// Enter the authenticated state with both halves of the credential, as
    /// returned by login or registration, and persist them.
    ///
    /// Storage never pairs the new token with the previous profile: the old
    /// profile is deleted first, and a failed write removes the new token
    /// again so the next restore starts anonymous.
    pub fn sign_in(&self, token: &str, profile: UserProfile) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Validation("token must not be empty".to_string()));
        }

        let _guard = self.begin();

        let json = serde_json::to_string(&profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize profile: {}", e)))?;

        self.publish(SessionState::Authenticated(Credential::new(
            token.to_string(),
            profile,
        )));
        tracing::info!("Signed in");

        self.store.delete(keys::USER_DATA).map_err(|e| {
            tracing::warn!(error = %e, "Failed to clear previous session");
            AppError::from(e)
        })?;

        let written = self
            .store
            .set(keys::AUTH_TOKEN, token)
            .and_then(|_| self.store.set(keys::USER_DATA, &json));
        if let Err(e) = written {
            tracing::warn!(error = %e, "Failed to persist session");
            if let Err(cleanup) = self.store.delete(keys::AUTH_TOKEN) {
                tracing::warn!(error = %cleanup, "Failed to remove partial session");
            }
            return Err(AppError::from(e));
        }
        Ok(())
    }

    /// Sign out: wipe storage, drop the in-memory session, go to login.
    ///
    /// Storage is cleared before memory. The session ends even if a delete
    /// fails; the first failure is returned so the caller can retry the wipe.
    pub fn logout(&self) -> Result<()> {
        let guard = self.begin();

        let mut first_error: Option<StoreError> = None;
        for key in [keys::AUTH_TOKEN, keys::USER_DATA] {
            if let Err(e) = self.store.delete(key) {
                tracing::warn!(key, error = %e, "Failed to delete persisted session key");
                first_error.get_or_insert(e);
            }
        }

        self.publish(SessionState::Anonymous);
        tracing::info!("Signed out");
        drop(guard);
        self.navigator.redirect(Route::Login);

        match first_error {
            Some(e) => Err(AppError::from(e)),
            None => Ok(()),
        }
    }
}
