//! Chart of accounts error types.

use thiserror::Error;
use uuid::Uuid;

use tallybook_shared::{AppError, ErrorKind};

use super::types::PartyType;

/// Errors that can occur while maintaining the chart of accounts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Account code is already used within the tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account name is blank.
    #[error("Account name cannot be empty")]
    EmptyName,

    /// Account code is blank.
    #[error("Account code cannot be empty")]
    EmptyCode,

    /// Parent account does not exist in the tenant.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Account does not exist in the tenant.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Party does not exist in the tenant.
    #[error("{party_type:?} not found: {party_id}")]
    PartyNotFound {
        /// Kind of party looked up.
        party_type: PartyType,
        /// Party identifier.
        party_id: Uuid,
    },

    /// Party kind cannot own a sub-ledger account.
    #[error("Party type {0:?} has no sub-ledger")]
    InvalidParty(PartyType),

    /// No free account code remains under the prefix.
    #[error("No free account code under prefix '{0}'")]
    CodeSpaceExhausted(String),
}

impl ChartError {
    /// Returns the error code for structured results.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::EmptyName => "EMPTY_ACCOUNT_NAME",
            Self::EmptyCode => "EMPTY_ACCOUNT_CODE",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::PartyNotFound { .. } => "PARTY_NOT_FOUND",
            Self::InvalidParty(_) => "INVALID_PARTY",
            Self::CodeSpaceExhausted(_) => "CODE_SPACE_EXHAUSTED",
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::EmptyCode | Self::InvalidParty(_) => ErrorKind::Validation,
            Self::ParentNotFound(_) | Self::AccountNotFound(_) | Self::PartyNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::DuplicateCode(_) | Self::CodeSpaceExhausted(_) => ErrorKind::Conflict,
        }
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ChartError::DuplicateCode("1001".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            ChartError::ParentNotFound(Uuid::nil()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ChartError::EmptyName.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = ChartError::DuplicateCode("1001".into()).into();
        assert_eq!(err, AppError::Conflict("Account code '1001' already exists".into()));
    }
}
