//! Shift error types.

use thiserror::Error;
use uuid::Uuid;

use tallybook_shared::{AppError, ErrorKind};

/// Errors that can occur in the shift lifecycle.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// The user already holds an open shift in the tenant.
    #[error("User already has an open shift")]
    AlreadyOpen,

    /// The shift is closed.
    #[error("Shift {0} is already closed")]
    AlreadyClosed(Uuid),

    /// Shift not found in the tenant.
    #[error("Shift not found: {0}")]
    NotFound(Uuid),

    /// Cash amounts cannot be negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),
}

impl ShiftError {
    /// Returns the error code for structured results.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyOpen => "SHIFT_ALREADY_OPEN",
            Self::AlreadyClosed(_) => "SHIFT_ALREADY_CLOSED",
            Self::NotFound(_) => "SHIFT_NOT_FOUND",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyOpen | Self::AlreadyClosed(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NegativeAmount(_) => ErrorKind::Validation,
        }
    }
}

impl From<ShiftError> for AppError {
    fn from(err: ShiftError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
