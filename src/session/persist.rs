//!
//! Durable session persistence
//! ---------------------------
//! The store persists at most one JSON document under a fixed key so a later
//! process start can rehydrate the session. Storage is abstracted behind a
//! three-operation key/value contract; two implementations live here, a
//! file-backed one for real clients and an in-memory one for tests and
//! embedding.
//!
//! The persisted payload carries the role as its raw wire string. It is
//! re-validated through the role catalog on restore so a corrupted value
//! surfaces as `UnknownRole` instead of being promoted to a real role.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::role::Role;
use super::identity::{AccountStatus, Identity};

/// Key under which the session payload is persisted.
pub const SESSION_KEY: &str = "session";

/// Current persisted payload version; anything else is treated as corrupt.
pub(crate) const PERSIST_VERSION: u32 = 1;

fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Minimal key/value persistence contract consumed by the session store.
#[allow(async_fn_in_trait)]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage: one JSON document per key under a root directory.
#[derive(Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at the given directory, creating it if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).with_context(|| format!("create storage root '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root_path(&self) -> &PathBuf { &self.root }

    fn key_path(&self, key: &str) -> PathBuf { self.root.join(format!("{}.json", sanitize_filename(key))) }
}

impl StorageBackend for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read '{}'", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        tokio::fs::write(&path, value)
            .await
            .with_context(|| format!("write '{}'", path.display()))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove '{}'", path.display())),
        }
    }
}

/// In-memory storage for tests and embedded use. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }
}

impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedIdentity {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    /// Raw role string; validated through `Role::parse` on rehydration.
    pub role: String,
    #[serde(default)]
    pub status: Option<AccountStatus>,
}

/// On-disk session payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub version: u32,
    pub identity: PersistedIdentity,
    pub token: String,
    pub issued_at_ms: i64,
    #[serde(default)]
    pub expires_at_ms: Option<i64>,
}

impl PersistedSession {
    pub(crate) fn from_parts(identity: &Identity, token: &str, issued_at_ms: i64, expires_at_ms: Option<i64>) -> Self {
        Self {
            version: PERSIST_VERSION,
            identity: PersistedIdentity {
                id: identity.id.clone(),
                email: identity.email.clone(),
                display_name: identity.display_name.clone(),
                role: identity.role.as_str().to_string(),
                status: identity.status,
            },
            token: token.to_string(),
            issued_at_ms,
            expires_at_ms,
        }
    }

    /// Validate the payload's identity back into a typed one.
    /// Fails with `UnknownRole` when the stored role string is not in the catalog.
    pub(crate) fn into_identity(self) -> AppResult<Identity> {
        let role = Role::parse(&self.identity.role)?;
        Ok(Identity {
            id: self.identity.id,
            email: self.identity.email,
            display_name: self.identity.display_name,
            role,
            status: self.identity.status,
        })
    }
}
