//! Invoices as seen by the ledger.
//!
//! Sales and purchasing record invoices; the ledger reads them for
//! statements and shift summaries and bumps `amount_paid` when an
//! installment is collected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use tallybook_shared::{AppError, ErrorKind};

/// Errors raised when recording an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Invoice number is blank.
    #[error("Invoice number cannot be empty")]
    EmptyNumber,

    /// Amounts cannot be negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// More collected than invoiced.
    #[error("Amount paid {paid} exceeds invoice total {total}")]
    PaidExceedsTotal {
        /// Invoice total.
        total: Decimal,
        /// Amount paid.
        paid: Decimal,
    },

    /// Invoice not found in the tenant.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),
}

impl InvoiceError {
    /// Returns the error code for structured results.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyNumber => "EMPTY_INVOICE_NUMBER",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::PaidExceedsTotal { .. } => "PAID_EXCEEDS_TOTAL",
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyNumber | Self::NegativeAmount(_) | Self::PaidExceedsTotal { .. } => {
                ErrorKind::Validation
            }
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

/// Checks the amounts of an invoice being recorded.
///
/// # Errors
///
/// `NegativeAmount` for negative amounts, `PaidExceedsTotal` when more was
/// collected than invoiced.
pub fn validate_amounts(total: Decimal, paid: Decimal) -> Result<(), InvoiceError> {
    if total < Decimal::ZERO {
        return Err(InvoiceError::NegativeAmount("Invoice total"));
    }
    if paid < Decimal::ZERO {
        return Err(InvoiceError::NegativeAmount("Amount paid"));
    }
    if paid > total {
        return Err(InvoiceError::PaidExceedsTotal { total, paid });
    }
    Ok(())
}

/// Settlement status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing collected.
    Unpaid,
    /// Partly collected.
    Partial,
    /// Fully collected.
    Paid,
}

impl PaymentStatus {
    /// Derives the status from the invoice total and the amount collected.
    #[must_use]
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if paid <= Decimal::ZERO {
            Self::Unpaid
        } else if paid >= total {
            Self::Paid
        } else {
            Self::Partial
        }
    }

    /// Returns true if an outstanding balance remains.
    #[must_use]
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Unpaid | Self::Partial)
    }
}

/// How the sale was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash into the drawer.
    Cash,
    /// Card.
    Visa,
    /// Anything else (transfer, credit).
    Other,
}

/// Outstanding amount of an invoice, never negative.
#[must_use]
pub fn outstanding(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(100), dec!(0), PaymentStatus::Unpaid)]
    #[case(dec!(100), dec!(40), PaymentStatus::Partial)]
    #[case(dec!(100), dec!(100), PaymentStatus::Paid)]
    #[case(dec!(100), dec!(120), PaymentStatus::Paid)]
    fn test_status_from_amounts(
        #[case] total: Decimal,
        #[case] paid: Decimal,
        #[case] expected: PaymentStatus,
    ) {
        assert_eq!(PaymentStatus::from_amounts(total, paid), expected);
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_amounts(dec!(300), dec!(300)).is_ok());
        assert!(validate_amounts(dec!(300), Decimal::ZERO).is_ok());
        assert!(matches!(
            validate_amounts(dec!(-1), Decimal::ZERO),
            Err(InvoiceError::NegativeAmount(_))
        ));
        let err = validate_amounts(dec!(100), dec!(150)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.error_code(), "PAID_EXCEEDS_TOTAL");
    }

    #[test]
    fn test_outstanding_is_clamped() {
        assert_eq!(outstanding(dec!(100), dec!(30)), dec!(70));
        assert_eq!(outstanding(dec!(100), dec!(130)), Decimal::ZERO);
    }
}
