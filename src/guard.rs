//! Single authorization decision point consulted before rendering any
//! role-restricted view.
//!
//! The decision is a pure function of (session, requirement); navigation on
//! `RedirectToLogin` and the "not authorized" rendering on `Deny` are the
//! caller's responsibility.

use std::collections::HashSet;
use tracing::debug;

use crate::role::Role;
use crate::session::Session;

/// Declared access requirement for a route.
///
/// "No roles declared" is spelled out as `AnyAuthenticated` rather than an
/// absent list, so an omitted role set cannot silently open a route. An empty
/// `Roles` set admits nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequirement {
    AnyAuthenticated,
    Roles(HashSet<Role>),
}

impl RouteRequirement {
    pub fn roles<I: IntoIterator<Item = Role>>(roles: I) -> Self {
        RouteRequirement::Roles(roles.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    Deny,
}

/// Evaluate a route requirement against the current session.
///
/// Authentication is always checked before authorization: a logged-out
/// caller is redirected, never shown a forbidden state that would reveal the
/// existence of a restricted page.
pub fn evaluate(session: &Session, requirement: &RouteRequirement) -> GuardDecision {
    let Some(identity) = session.identity() else {
        return GuardDecision::RedirectToLogin;
    };
    match requirement {
        RouteRequirement::AnyAuthenticated => GuardDecision::Allow,
        RouteRequirement::Roles(allowed) => {
            if allowed.contains(&identity.role) {
                GuardDecision::Allow
            } else {
                debug!(target: "casegate::guard", "deny user='{}' role='{}'", identity.id, identity.role);
                GuardDecision::Deny
            }
        }
    }
}
