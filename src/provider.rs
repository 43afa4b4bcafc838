//! Authentication API surface consumed by the session core.
//!
//! The network client that actually talks to the case-management API lives
//! outside this crate; implementations of `AuthProvider` hand back an
//! identity/token pair on success, and the core feeds it to the session
//! store. Failed logins never reach `set_auth`.

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::routes::{landing_route_for, RoutePath};
use crate::session::{Identity, SessionStore, StorageBackend};

/// Stable error codes surfaced verbatim to the user-facing form layer.
pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
pub const EXPIRED_INVITATION: &str = "expired_invitation";
pub const VALIDATION_ERROR: &str = "validation";

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub invitation_token: String,
}

/// Successful authentication result: the principal plus its bearer token.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub identity: Identity,
    pub token: String,
}

#[allow(async_fn_in_trait)]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> AppResult<AuthSuccess>;
    async fn register(&self, req: &RegisterRequest) -> AppResult<AuthSuccess>;
}

pub fn invalid_credentials() -> AppError {
    AppError::auth(INVALID_CREDENTIALS, "email or password is incorrect")
}

pub fn expired_invitation() -> AppError {
    AppError::auth(EXPIRED_INVITATION, "the invitation link has expired")
}

/// Wire a successful login/registration into the session store and pick the
/// landing route for the authenticated role. This is the single place the
/// redirect policy is consulted after authentication.
pub async fn complete_auth<S: StorageBackend>(
    store: &SessionStore<S>,
    success: AuthSuccess,
) -> AppResult<RoutePath> {
    let role = success.identity.role;
    store.set_auth(success.identity, success.token).await?;
    let route = landing_route_for(role);
    debug!(target: "casegate::session", "auth complete: role='{}' landing='{}'", role, route);
    Ok(route)
}
