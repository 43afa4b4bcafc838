//! Closed role catalog governing authorization and display labels.
//!
//! Roles form a fixed set; anything outside it is rejected at parse time so a
//! corrupted persisted value can never be promoted to a real role.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Arbitrator,
    Lawyer,
    Party,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Arbitrator, Role::Lawyer, Role::Party];

    /// Canonical wire string; the exact value serde uses, so persisted
    /// payloads and `parse` always agree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Arbitrator => "arbitrator",
            Role::Lawyer => "lawyer",
            Role::Party => "party",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Arbitrator => "Arbitrator",
            Role::Lawyer => "Lawyer",
            Role::Party => "Party",
        }
    }

    /// Parse a raw string into a role, case-insensitively.
    /// Rejects anything outside the fixed set instead of defaulting.
    pub fn parse(raw: &str) -> AppResult<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "arbitrator" => Ok(Role::Arbitrator),
            "lawyer" => Ok(Role::Lawyer),
            "party" => Ok(Role::Party),
            _ => Err(AppError::unknown_role(raw)),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;
    fn from_str(s: &str) -> AppResult<Role> { Role::parse(s) }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}
