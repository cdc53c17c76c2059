//! Installment error types.

use thiserror::Error;
use uuid::Uuid;

use tallybook_shared::{AppError, ErrorKind};

/// Errors that can occur while planning or collecting installments.
#[derive(Debug, Error)]
pub enum InstallmentError {
    /// Plan needs at least one installment.
    #[error("Installment count must be at least 1")]
    InvalidCount,

    /// Plan has more rows than allowed.
    #[error("Installment count must not exceed {max}, got {count}")]
    TooManyInstallments {
        /// Requested rows.
        count: u32,
        /// Upper bound.
        max: u32,
    },

    /// Amounts and interest cannot be negative.
    #[error("{0} cannot be negative")]
    NegativeValue(&'static str),

    /// Down payment leaves nothing to finance.
    #[error("Down payment must be less than the invoice total")]
    DownPaymentTooLarge,

    /// Financed amount is too small to split into the requested rows.
    #[error("Financed amount is too small for {0} installments")]
    PlanTooSmall(u32),

    /// Due date overflowed the calendar.
    #[error("Due date out of range")]
    DateOutOfRange,

    /// Invoice not found in the tenant.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Walk-in invoices have no customer to collect from.
    #[error("Invoice {0} has no customer")]
    NoCustomer(Uuid),

    /// Invoice already has a plan.
    #[error("Invoice {0} already has an installment plan")]
    PlanExists(Uuid),

    /// Installment not found in the tenant.
    #[error("Installment not found: {0}")]
    NotFound(Uuid),

    /// Installment already collected.
    #[error("Installment {0} is already paid")]
    AlreadyPaid(Uuid),
}

impl InstallmentError {
    /// Returns the error code for structured results.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCount | Self::TooManyInstallments { .. } => "INVALID_INSTALLMENT_COUNT",
            Self::NegativeValue(_) => "NEGATIVE_VALUE",
            Self::DownPaymentTooLarge => "DOWN_PAYMENT_TOO_LARGE",
            Self::PlanTooSmall(_) => "PLAN_TOO_SMALL",
            Self::DateOutOfRange => "DATE_OUT_OF_RANGE",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::NoCustomer(_) => "INVOICE_WITHOUT_CUSTOMER",
            Self::PlanExists(_) => "PLAN_EXISTS",
            Self::NotFound(_) => "INSTALLMENT_NOT_FOUND",
            Self::AlreadyPaid(_) => "INSTALLMENT_ALREADY_PAID",
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCount
            | Self::TooManyInstallments { .. }
            | Self::NegativeValue(_)
            | Self::DownPaymentTooLarge
            | Self::PlanTooSmall(_)
            | Self::DateOutOfRange
            | Self::NoCustomer(_) => ErrorKind::Validation,
            Self::InvoiceNotFound(_) | Self::NotFound(_) => ErrorKind::NotFound,
            Self::PlanExists(_) | Self::AlreadyPaid(_) => ErrorKind::Conflict,
        }
    }
}

impl From<InstallmentError> for AppError {
    fn from(err: InstallmentError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
