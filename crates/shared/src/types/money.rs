//! Currency precision and rounding policy.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every tenant books in a single currency with two decimal places. Amounts
//! are rounded half away from zero ("half-up"). A journal entry is balanced
//! when |debits - credits| is strictly below one minor unit, so a full cent of
//! drift (100.00 vs 99.99) is rejected.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of the tenant currency.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Exclusive bound on the difference between debit and credit totals.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to currency precision, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if `a` and `b` differ by less than `tolerance`.
#[must_use]
pub fn is_within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() < tolerance
}
