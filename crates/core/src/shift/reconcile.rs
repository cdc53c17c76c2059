//! Shift summary and reconciliation.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ShiftError;
use super::types::{CashVoucherFact, Reconciliation, SaleFact, ShiftStatus, ShiftSummary};
use crate::invoice::{PaymentMethod, outstanding};
use crate::ledger::VoucherType;

/// Stateless shift calculator.
pub struct ShiftService;

impl ShiftService {
    /// Aggregates the sales and vouchers linked to one shift.
    #[must_use]
    pub fn summarize(sales: &[SaleFact], vouchers: &[CashVoucherFact]) -> ShiftSummary {
        let mut summary = ShiftSummary::default();
        for sale in sales {
            match sale.payment_method {
                PaymentMethod::Cash => summary.cash_sales += sale.amount_paid,
                PaymentMethod::Visa => summary.visa_sales += sale.amount_paid,
                PaymentMethod::Other => {}
            }
            if sale.payment_status.is_outstanding() {
                summary.unpaid_sales += outstanding(sale.total_amount, sale.amount_paid);
            }
        }
        for voucher in vouchers {
            match voucher.voucher_type {
                VoucherType::Receipt => summary.receipts += voucher.amount,
                VoucherType::Payment => summary.payments += voucher.amount,
            }
        }
        summary.net_cash_movement = summary.cash_sales + summary.receipts - summary.payments;
        summary
    }

    /// Compares counted cash with what the drawer should hold.
    ///
    /// # Errors
    ///
    /// `NegativeAmount` if the counted cash is negative.
    pub fn reconcile(
        start_balance: Decimal,
        summary: &ShiftSummary,
        actual_cash: Decimal,
    ) -> Result<Reconciliation, ShiftError> {
        if actual_cash < Decimal::ZERO {
            return Err(ShiftError::NegativeAmount("Counted cash"));
        }
        let expected_cash = start_balance + summary.net_cash_movement;
        Ok(Reconciliation {
            expected_cash,
            actual_cash,
            variance: actual_cash - expected_cash,
        })
    }

    /// Checks the opening float.
    ///
    /// # Errors
    ///
    /// `NegativeAmount` if the float is negative.
    pub fn validate_start_balance(start_balance: Decimal) -> Result<(), ShiftError> {
        if start_balance < Decimal::ZERO {
            return Err(ShiftError::NegativeAmount("Start balance"));
        }
        Ok(())
    }

    /// Checks that a shift may be closed.
    ///
    /// # Errors
    ///
    /// `AlreadyClosed` for closed shifts.
    pub fn validate_can_close(id: Uuid, status: ShiftStatus) -> Result<(), ShiftError> {
        match status {
            ShiftStatus::Open => Ok(()),
            ShiftStatus::Closed => Err(ShiftError::AlreadyClosed(id)),
        }
    }
}
