//! Route catalog and the post-login redirect policy.
//!
//! `landing_route_for` is consulted once per login/registration success and
//! `entry_route` once at application-root entry; neither is ever used to
//! relocate an already-navigating user mid-session.

use std::fmt::{Display, Formatter};

use crate::role::Role;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePath {
    Login,
    AdminDashboard,
    ArbitratorDashboard,
    LawyerDashboard,
    PartyDashboard,
}

impl RoutePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutePath::Login => "/login",
            RoutePath::AdminDashboard => "/admin-dashboard",
            RoutePath::ArbitratorDashboard => "/arbitrator-dashboard",
            RoutePath::LawyerDashboard => "/lawyer-dashboard",
            RoutePath::PartyDashboard => "/party-dashboard",
        }
    }
}

impl Display for RoutePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Default landing route for an authenticated role.
pub fn landing_route_for(role: Role) -> RoutePath {
    match role {
        Role::Admin => RoutePath::AdminDashboard,
        Role::Arbitrator => RoutePath::ArbitratorDashboard,
        Role::Lawyer => RoutePath::LawyerDashboard,
        Role::Party => RoutePath::PartyDashboard,
    }
}

/// Application-root rule: an authenticated session lands on its role's
/// dashboard, everyone else goes to login.
pub fn entry_route(session: &Session) -> RoutePath {
    match session.identity() {
        Some(identity) => landing_route_for(identity.role),
        None => RoutePath::Login,
    }
}
