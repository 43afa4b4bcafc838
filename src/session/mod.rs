//! Session state and durable persistence for the access-guard core.
//! Keep the public surface thin and split implementation across sub-modules.

mod identity;
mod persist;
mod store;

pub use identity::{AccountStatus, Identity};
pub use persist::{FileStorage, MemoryStorage, PersistedIdentity, PersistedSession, StorageBackend, SESSION_KEY};
pub use store::{Session, SessionConfig, SessionStore, SharedSessionStore};
