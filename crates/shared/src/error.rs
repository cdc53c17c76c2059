//! Application-wide error taxonomy and the uniform operation result.
//!
//! Every core operation reports failures as one of four kinds. Business
//! failures (validation, not found, conflict) travel back to callers inside an
//! [`OpResult`]; infrastructure faults are the only ones worth alerting on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected before any write.
    Validation,
    /// Unknown or cross-tenant reference.
    NotFound,
    /// State does not allow the operation (already paid, already closed, ...).
    Conflict,
    /// Storage or other infrastructure fault; partial writes are rolled back.
    Infrastructure,
}

/// Application error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict with the current state of a resource.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage unavailable or failed mid-transaction.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl AppError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Returns the error code for structured results.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Infrastructure(_) => "INFRASTRUCTURE_ERROR",
        }
    }

    /// Builds an error of the given kind.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Infrastructure => Self::Infrastructure(message),
        }
    }

    /// Returns the bare message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Infrastructure(m) => m,
        }
    }

    /// Returns true for expected business failures.
    #[must_use]
    pub const fn is_business(&self) -> bool {
        !matches!(self, Self::Infrastructure(_))
    }
}

/// Uniform result shape returned across the in-process boundary.
///
/// Serializes as `{ "success": bool, "data"?: T, "message"?: string, "code"?: string }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpResult<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Machine-readable failure code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> OpResult<T> {
    /// Successful result carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            code: None,
        }
    }

    /// Failed result built from an error.
    #[must_use]
    pub fn fail(error: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(error.message().to_string()),
            code: Some(error.error_code().to_string()),
        }
    }

    /// Returns the failure kind, if any.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self.code.as_deref() {
            None => None,
            Some("VALIDATION_ERROR") => Some(ErrorKind::Validation),
            Some("NOT_FOUND") => Some(ErrorKind::NotFound),
            Some("CONFLICT") => Some(ErrorKind::Conflict),
            Some(_) => Some(ErrorKind::Infrastructure),
        }
    }
}

impl<T> From<AppResult<T>> for OpResult<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(&e),
        }
    }
}
