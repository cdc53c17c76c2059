//! Ledger error types for validation and state errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use tallybook_shared::{AppError, ErrorKind};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry needs at least one debit and one credit line.
    #[error("Journal entry needs at least one debit and one credit line")]
    OneSided,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Line has neither a debit nor a credit.
    #[error("Line for account {0} has no amount")]
    EmptyLine(Uuid),

    /// Line has both a debit and a credit.
    #[error("Line for account {0} must specify either debit or credit, not both")]
    BothSides(Uuid),

    /// Amount has more decimal places than the currency allows.
    #[error("Amount {0} exceeds currency precision")]
    ExcessPrecision(Decimal),

    /// Description is blank.
    #[error("Journal entry description is required")]
    MissingDescription,

    /// No fiscal year covers the entry date.
    #[error("No fiscal year found for date {0}")]
    NoFiscalYear(NaiveDate),

    /// Fiscal year is closed.
    #[error("Fiscal year is closed, no posting allowed")]
    FiscalYearClosed,

    /// Entry date falls outside the chosen fiscal year.
    #[error("Date {0} is outside the fiscal year")]
    DateOutsideFiscalYear(NaiveDate),

    /// Fiscal year must start before it ends.
    #[error("Fiscal year start date must be before its end date")]
    InvalidFiscalYearRange,

    /// Only posted entries can be reversed.
    #[error("Draft entries cannot be reversed")]
    CannotReverseDraft,

    /// Voucher amount must be positive.
    #[error("Voucher amount must be greater than zero")]
    InvalidVoucherAmount,

    /// Voucher counterparty is incomplete.
    #[error("Voucher counterparty is missing: {0}")]
    MissingCounterparty(&'static str),

    // ========== Not Found Errors ==========
    /// Account not found in the tenant.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Fiscal year not found in the tenant.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(Uuid),

    /// Journal entry not found in the tenant.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Customer or supplier not found in the tenant.
    #[error("Party not found: {0}")]
    PartyNotFound(Uuid),

    /// Shift not found in the tenant.
    #[error("Shift not found: {0}")]
    ShiftNotFound(Uuid),

    // ========== State Errors ==========
    /// Entry is already posted.
    #[error("Journal entry {0} is already posted")]
    AlreadyPosted(Uuid),

    /// Fiscal year is already closed.
    #[error("Fiscal year {0} is already closed")]
    FiscalYearAlreadyClosed(Uuid),

    /// Entry already has a reversal.
    #[error("Journal entry {0} has already been reversed")]
    AlreadyReversed(Uuid),

    /// Shift is not open.
    #[error("Shift {0} is not open")]
    ShiftNotOpen(Uuid),

    /// New fiscal year shares days with an existing one.
    #[error("Fiscal year overlaps an existing fiscal year ({0})")]
    OverlappingFiscalYear(String),
}

impl LedgerError {
    /// Returns the error code for structured results.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::OneSided => "ONE_SIDED_ENTRY",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::EmptyLine(_) => "EMPTY_LINE",
            Self::BothSides(_) => "INVALID_LINE",
            Self::ExcessPrecision(_) => "EXCESS_PRECISION",
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::NoFiscalYear(_) => "NO_FISCAL_YEAR",
            Self::FiscalYearClosed => "FISCAL_YEAR_CLOSED",
            Self::DateOutsideFiscalYear(_) => "DATE_OUTSIDE_FISCAL_YEAR",
            Self::InvalidFiscalYearRange => "INVALID_FISCAL_YEAR_RANGE",
            Self::OverlappingFiscalYear(_) => "OVERLAPPING_FISCAL_YEAR",
            Self::CannotReverseDraft => "CANNOT_REVERSE_DRAFT",
            Self::InvalidVoucherAmount => "INVALID_VOUCHER_AMOUNT",
            Self::MissingCounterparty(_) => "MISSING_COUNTERPARTY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::FiscalYearNotFound(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::PartyNotFound(_) => "PARTY_NOT_FOUND",
            Self::ShiftNotFound(_) => "SHIFT_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::FiscalYearAlreadyClosed(_) => "FISCAL_YEAR_ALREADY_CLOSED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::ShiftNotOpen(_) => "SHIFT_NOT_OPEN",
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientLines(_)
            | Self::Unbalanced { .. }
            | Self::OneSided
            | Self::NegativeAmount
            | Self::EmptyLine(_)
            | Self::BothSides(_)
            | Self::ExcessPrecision(_)
            | Self::MissingDescription
            | Self::NoFiscalYear(_)
            | Self::FiscalYearClosed
            | Self::DateOutsideFiscalYear(_)
            | Self::InvalidFiscalYearRange
            | Self::CannotReverseDraft
            | Self::InvalidVoucherAmount
            | Self::MissingCounterparty(_) => ErrorKind::Validation,

            Self::AccountNotFound(_)
            | Self::FiscalYearNotFound(_)
            | Self::EntryNotFound(_)
            | Self::PartyNotFound(_)
            | Self::ShiftNotFound(_) => ErrorKind::NotFound,

            Self::AlreadyPosted(_)
            | Self::FiscalYearAlreadyClosed(_)
            | Self::AlreadyReversed(_)
            | Self::ShiftNotOpen(_)
            | Self::OverlappingFiscalYear(_) => ErrorKind::Conflict,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InsufficientLines(1).error_code(), "INSUFFICIENT_LINES");
        assert_eq!(
            LedgerError::Unbalanced {
                debit: Decimal::new(100, 2),
                credit: Decimal::new(50, 2),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(LedgerError::NegativeAmount.error_code(), "NEGATIVE_AMOUNT");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(LedgerError::OneSided.kind(), ErrorKind::Validation);
        assert_eq!(
            LedgerError::AccountNotFound(Uuid::nil()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LedgerError::AlreadyReversed(Uuid::nil()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(LedgerError::InvalidFiscalYearRange.kind(), ErrorKind::Validation);
        assert_eq!(
            LedgerError::OverlappingFiscalYear("2026-01-01 to 2026-12-31".into()).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Unbalanced {
            debit: Decimal::new(10000, 2),
            credit: Decimal::new(9999, 2),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 99.99"
        );

        let err = LedgerError::NoFiscalYear(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(err.to_string(), "No fiscal year found for date 2024-01-15");
    }

    #[test]
    fn test_into_app_error_keeps_kind() {
        let err: AppError = LedgerError::InsufficientLines(1).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "Journal entry must have at least 2 lines, got 1");
    }
}
