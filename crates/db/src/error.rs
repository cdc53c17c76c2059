//! Repository error: a domain failure or a storage fault.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use tallybook_core::chart::ChartError;
use tallybook_core::installment::InstallmentError;
use tallybook_core::invoice::InvoiceError;
use tallybook_core::ledger::LedgerError;
use tallybook_core::shift::ShiftError;
use tallybook_core::statement::StatementError;
use tallybook_shared::{AppError, ErrorKind};

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every repository.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Chart of accounts failure.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Journal posting failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Statement failure.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// Invoice capture failure.
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    /// Installment failure.
    #[error(transparent)]
    Installment(#[from] InstallmentError),

    /// Shift failure.
    #[error(transparent)]
    Shift(#[from] ShiftError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepoError {
    /// Taxonomy kind of this error.
    ///
    /// Unique violations surface as conflicts; every other storage error is
    /// an infrastructure fault.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Chart(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Statement(e) => e.kind(),
            Self::Invoice(e) => e.kind(),
            Self::Installment(e) => e.kind(),
            Self::Shift(e) => e.kind(),
            Self::Database(e) if is_unique_violation(e) => ErrorKind::Conflict,
            Self::Database(_) => ErrorKind::Infrastructure,
        }
    }

    /// Machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Chart(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Statement(e) => e.error_code(),
            Self::Invoice(e) => e.error_code(),
            Self::Installment(e) => e.error_code(),
            Self::Shift(e) => e.error_code(),
            Self::Database(e) if is_unique_violation(e) => "DUPLICATE_RECORD",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Returns true if the error is a unique constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Chart(e) => e.into(),
            RepoError::Ledger(e) => e.into(),
            RepoError::Statement(e) => e.into(),
            RepoError::Invoice(e) => e.into(),
            RepoError::Installment(e) => e.into(),
            RepoError::Shift(e) => e.into(),
            RepoError::Database(ref e) if is_unique_violation(e) => {
                Self::Conflict("Record already exists".to_string())
            }
            RepoError::Database(e) => Self::Infrastructure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_kinds_pass_through() {
        let err: RepoError = ShiftError::AlreadyOpen.into();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err: RepoError = LedgerError::AccountNotFound(Uuid::nil()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(AppError::from(err).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_database_error_is_infrastructure() {
        let err = RepoError::Database(DbErr::Custom("connection reset".into()));
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(!AppError::from(err).is_business());
    }
}
