//! Unified application error model for the session/guard core.
//! This module provides a common error enum used across the session store,
//! role catalog and auth-provider surface, along with the policy deciding
//! which failures may be shown to the user.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    Validation { code: String, message: String },
    Auth { code: String, message: String },
    UnknownRole { code: String, message: String },
    Restore { code: String, message: String },
    Storage { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Validation { code, .. }
            | AppError::Auth { code, .. }
            | AppError::UnknownRole { code, .. }
            | AppError::Restore { code, .. }
            | AppError::Storage { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::Auth { message, .. }
            | AppError::UnknownRole { message, .. }
            | AppError::Restore { message, .. }
            | AppError::Storage { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn validation(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Validation { code: code.into(), message: msg.into() } }
    pub fn auth(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn unknown_role(raw: impl Display) -> Self { AppError::UnknownRole { code: "unknown_role".into(), message: format!("'{}' is not a recognized role", raw) } }
    pub fn restore(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Restore { code: code.into(), message: msg.into() } }
    pub fn storage(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Storage { code: code.into(), message: msg.into() } }
    pub fn internal(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Whether the error is meant for the user-facing form layer.
    ///
    /// Auth and validation failures are surfaced verbatim; restore and
    /// storage failures are cold-start/infrastructure conditions handled
    /// internally, and a rejected role string must never leak storage
    /// contents to the screen.
    pub fn user_visible(&self) -> bool {
        match self {
            AppError::Validation { .. } | AppError::Auth { .. } => true,
            AppError::UnknownRole { .. }
            | AppError::Restore { .. }
            | AppError::Storage { .. }
            | AppError::Internal { .. } => false,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Default mapping: treat as Storage unless constructed explicitly
        AppError::Storage { code: "storage_error".into(), message: err.to_string() }
    }
}
