//! Installment domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Collection status of one installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Nothing collected.
    Pending,
    /// Part collected.
    PartiallyPaid,
    /// Fully collected (terminal).
    Paid,
}

/// Terms of a new plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInput {
    /// Invoice total the plan finances.
    pub total_amount: Decimal,
    /// Paid up front, outside the plan.
    pub down_payment: Decimal,
    /// Number of installments.
    pub count: u32,
    /// Flat interest on the financed amount, in percent.
    pub interest_percent: Decimal,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
}

/// One generated row of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    /// 1-based position in the plan.
    pub sequence: u32,
    /// Due date.
    pub due_date: NaiveDate,
    /// Amount due.
    pub amount: Decimal,
    /// Part of `amount` that repays the invoice; the rest is interest.
    pub principal: Decimal,
}
