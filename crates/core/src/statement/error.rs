//! Statement error types.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use tallybook_shared::{AppError, ErrorKind};

/// Errors that can occur while building a statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Range start is after its end.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },

    /// Party statements need a customer or a supplier.
    #[error("Statements are only available for customers and suppliers")]
    InvalidSubject,

    /// Account not found in the tenant.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Customer or supplier not found in the tenant.
    #[error("Party not found: {0}")]
    PartyNotFound(Uuid),
}

impl StatementError {
    /// Returns the error code for structured results.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "INVALID_DATE_RANGE",
            Self::InvalidSubject => "INVALID_STATEMENT_SUBJECT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::PartyNotFound(_) => "PARTY_NOT_FOUND",
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRange { .. } | Self::InvalidSubject => ErrorKind::Validation,
            Self::AccountNotFound(_) | Self::PartyNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<StatementError> for AppError {
    fn from(err: StatementError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
