//!
//! Session store
//! -------------
//! Single source of truth for the current authentication state. The store is
//! explicitly constructed with its storage backend and handed to the layers
//! that need it; there is no ambient global session.
//!
//! In-memory state is authoritative: `set_auth`/`logout` update it before
//! touching durable storage, so every subsequent guard evaluation sees the
//! new state even while a persistence write is still in flight or has
//! failed. `restore()` must be awaited before the first evaluation is
//! trusted to reflect a prior session.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::role::Role;
use super::identity::Identity;
use super::persist::{PersistedSession, StorageBackend, PERSIST_VERSION, SESSION_KEY};

/// Current authentication state. The inconsistent combinations (an identity
/// without a token, a token without an identity) are unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { identity: Identity, token: String },
}

impl Session {
    /// Build an authenticated session. An empty or blank token is rejected,
    /// keeping "authenticated iff identity present and token non-empty" true
    /// by construction.
    pub fn authenticated(identity: Identity, token: impl Into<String>) -> AppResult<Session> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::validation("empty_token", "bearer token must be non-empty"));
        }
        Ok(Session::Authenticated { identity, token })
    }

    pub fn is_authenticated(&self) -> bool { matches!(self, Session::Authenticated { .. }) }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { identity, .. } => Some(identity),
            Session::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token.as_str()),
            Session::Anonymous => None,
        }
    }
}

/// Store tuning, serde-loadable with defaults for every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage key the session payload is persisted under.
    #[serde(default = "SessionConfig::default_storage_key")]
    pub storage_key: String,
    /// Session lifetime in milliseconds; `None` disables expiry.
    /// Enforced at restore time only, never mid-session.
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SessionConfig {
    fn default_storage_key() -> String { SESSION_KEY.to_string() }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { storage_key: Self::default_storage_key(), ttl_ms: None }
    }
}

pub struct SessionStore<S: StorageBackend> {
    storage: S,
    config: SessionConfig,
    state: RwLock<Session>,
}

impl<S: StorageBackend> SessionStore<S> {
    pub fn new(storage: S) -> Self { Self::with_config(storage, SessionConfig::default()) }

    pub fn with_config(storage: S, config: SessionConfig) -> Self {
        Self { storage, config, state: RwLock::new(Session::Anonymous) }
    }

    /// Cheap clone of the current session for guard evaluation.
    pub fn snapshot(&self) -> Session { self.state.read().clone() }

    pub fn is_authenticated(&self) -> bool { self.state.read().is_authenticated() }

    pub fn identity(&self) -> Option<Identity> { self.state.read().identity().cloned() }

    pub fn token(&self) -> Option<String> { self.state.read().token().map(|t| t.to_string()) }

    /// True iff authenticated and the current role is in `allowed`.
    /// Pure set membership: an empty `allowed` set is always false, and so is
    /// an unauthenticated session. Never errors.
    pub fn has_role(&self, allowed: &HashSet<Role>) -> bool {
        match self.state.read().identity() {
            Some(identity) => allowed.contains(&identity.role),
            None => false,
        }
    }

    /// Rehydrate the session from durable storage.
    ///
    /// Missing or malformed data is an expected cold start, not a failure:
    /// the store stays anonymous and nothing is surfaced to the caller.
    /// Rejected payloads (bad version, unknown role, empty token, expired)
    /// are removed from storage so the next start is a clean cold start.
    /// Idempotent.
    pub async fn restore(&self) {
        let raw = match self.storage.get(&self.config.storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(target: "casegate::session", "restore: no persisted session");
                return;
            }
            Err(e) => {
                warn!(target: "casegate::session", "restore: storage read failed: {:#}", e);
                return;
            }
        };
        match self.rehydrate(&raw) {
            Ok(session) => {
                *self.state.write() = session;
                debug!(target: "casegate::session", "restore: session rehydrated");
            }
            Err(e) => {
                warn!(target: "casegate::session", "restore: discarding persisted session: {}", e);
                self.discard_persisted().await;
            }
        }
    }

    fn rehydrate(&self, raw: &str) -> AppResult<Session> {
        let payload: PersistedSession = serde_json::from_str(raw)
            .map_err(|e| AppError::restore("restore_parse", format!("malformed session payload: {}", e)))?;
        if payload.version != PERSIST_VERSION {
            return Err(AppError::restore(
                "restore_version",
                format!("unsupported session payload version {}", payload.version),
            ));
        }
        if let Some(expires_at_ms) = payload.expires_at_ms {
            if expires_at_ms <= Utc::now().timestamp_millis() {
                return Err(AppError::restore("restore_expired", "persisted session has expired"));
            }
        }
        let token = payload.token.clone();
        let identity = payload.into_identity()?;
        Session::authenticated(identity, token)
    }

    /// Replace the session wholesale with the given identity/token, then
    /// persist the pair for future restores. No merge with prior state.
    ///
    /// The in-memory replacement happens first and stays in effect even if
    /// the persistence write fails; the failure is logged and returned so the
    /// caller can surface or retry it.
    pub async fn set_auth(&self, identity: Identity, token: impl Into<String>) -> AppResult<()> {
        let session = Session::authenticated(identity, token)?;
        let issued_at_ms = Utc::now().timestamp_millis();
        let expires_at_ms = self.config.ttl_ms.map(|ttl| issued_at_ms + ttl as i64);
        let Session::Authenticated { identity: id, token: tok } = &session else {
            return Err(AppError::internal("persist_encode", "authenticated constructor yielded anonymous session"));
        };
        let payload = PersistedSession::from_parts(id, tok, issued_at_ms, expires_at_ms);
        {
            let mut state = self.state.write();
            *state = session;
        }
        debug!(target: "casegate::session", "set_auth: session replaced");
        let text = serde_json::to_string_pretty(&payload)
            .map_err(|e| AppError::internal("persist_encode", format!("encode session payload: {}", e)))?;
        if let Err(e) = self.storage.set(&self.config.storage_key, &text).await {
            warn!(target: "casegate::session", "set_auth: persistence failed: {:#}", e);
            return Err(AppError::storage("persist_write", format!("persist session: {:#}", e)));
        }
        Ok(())
    }

    /// Clear the session and drop the persisted copy.
    /// Safe to call when already logged out; calling twice equals calling once.
    pub async fn logout(&self) {
        let previous = std::mem::take(&mut *self.state.write());
        if previous.is_authenticated() {
            debug!(target: "casegate::session", "logout: session cleared");
        }
        self.discard_persisted().await;
    }

    async fn discard_persisted(&self) {
        if let Err(e) = self.storage.remove(&self.config.storage_key).await {
            warn!(target: "casegate::session", "failed to remove persisted session: {:#}", e);
        }
    }
}

/// Shared handle for passing one store across the UI tree.
pub struct SharedSessionStore<S: StorageBackend>(pub Arc<SessionStore<S>>);

impl<S: StorageBackend> Clone for SharedSessionStore<S> {
    fn clone(&self) -> Self { SharedSessionStore(self.0.clone()) }
}

impl<S: StorageBackend> SharedSessionStore<S> {
    pub fn new(store: SessionStore<S>) -> Self { SharedSessionStore(Arc::new(store)) }
}

impl<S: StorageBackend> std::ops::Deref for SharedSessionStore<S> {
    type Target = SessionStore<S>;
    fn deref(&self) -> &Self::Target { &self.0 }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
