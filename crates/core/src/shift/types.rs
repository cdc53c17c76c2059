//! Shift domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::{PaymentMethod, PaymentStatus};
use crate::ledger::VoucherType;

/// Shift lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    /// Drawer in use.
    Open,
    /// Reconciled (terminal).
    Closed,
}

/// A sales invoice recorded during the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleFact {
    /// Tender.
    pub payment_method: PaymentMethod,
    /// Settlement status.
    pub payment_status: PaymentStatus,
    /// Invoice total.
    pub total_amount: Decimal,
    /// Amount collected.
    pub amount_paid: Decimal,
}

/// A voucher recorded during the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashVoucherFact {
    /// Receipt or payment.
    pub voucher_type: VoucherType,
    /// Amount.
    pub amount: Decimal,
}

/// Aggregates of one shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSummary {
    /// Cash collected on sales.
    pub cash_sales: Decimal,
    /// Card collected on sales.
    pub visa_sales: Decimal,
    /// Outstanding balance of unpaid and partial sales.
    pub unpaid_sales: Decimal,
    /// Receipt vouchers.
    pub receipts: Decimal,
    /// Payment vouchers.
    pub payments: Decimal,
    /// `cash_sales + receipts - payments`.
    pub net_cash_movement: Decimal,
}

/// Result of counting the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// `start_balance + net_cash_movement`.
    pub expected_cash: Decimal,
    /// Counted cash.
    pub actual_cash: Decimal,
    /// `actual_cash - expected_cash`; informational only.
    pub variance: Decimal,
}
