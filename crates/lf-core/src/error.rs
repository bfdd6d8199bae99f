//! # AppError
//!
//! Centralized error handling for the lost & found service.
//! Every collaborator failure is folded into one of these variants at the
//! plugin boundary, so handlers only ever see this taxonomy.

use thiserror::Error;

/// The primary error type for all lf-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Missing or invalid input (e.g., absent username, unknown item type)
    #[error("validation error: {0}")]
    Validation(String),

    /// A unique field is already taken (e.g., duplicate username or email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials did not check out, or the bearer token is bad
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (e.g., Item)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// A collaborator (store, SMS gateway) failed or timed out
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Anything else that is our own fault
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(..) => "not_found",
            Self::Upstream(_) => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// A specialized Result type for lost & found logic.
pub type Result<T> = std::result::Result<T, AppError>;
