//! Plan generation and collection rules.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use tallybook_shared::types::{CURRENCY_DECIMALS, round_money};

use super::error::InstallmentError;
use super::types::{InstallmentStatus, PlanInput, ScheduledInstallment};

/// Returns true if an installment is past due and not fully collected.
///
/// This is the only definition of "overdue"; it is never stored.
#[must_use]
pub fn is_overdue(due_date: NaiveDate, status: InstallmentStatus, today: NaiveDate) -> bool {
    due_date < today && status != InstallmentStatus::Paid
}

/// Longest plan accepted: fifty years of monthly rows.
pub const MAX_INSTALLMENTS: u32 = 600;

/// Stateless installment planner.
pub struct InstallmentScheduler;

impl InstallmentScheduler {
    /// Part of the invoice the plan repays: `total - down`.
    #[must_use]
    pub fn principal_amount(input: &PlanInput) -> Decimal {
        round_money(input.total_amount - input.down_payment)
    }

    /// Amount financed by the plan: `(total - down) * (1 + interest / 100)`, rounded.
    #[must_use]
    pub fn financed_amount(input: &PlanInput) -> Decimal {
        let principal = input.total_amount - input.down_payment;
        round_money(principal + principal * input.interest_percent / Decimal::ONE_HUNDRED)
    }

    /// Interest charged on top of the principal.
    #[must_use]
    pub fn interest_amount(input: &PlanInput) -> Decimal {
        Self::financed_amount(input) - Self::principal_amount(input)
    }

    /// Generates the plan rows.
    ///
    /// Every row but the last is the per-row share truncated to cents; the
    /// last row absorbs the remainder so the rows sum exactly to the financed
    /// amount. Interest is spread over the rows the same way, in proportion
    /// to each row's amount, so the principal shares sum to `total - down`.
    /// Due dates start at `start_date` and advance one calendar month at a
    /// time (clamped to month end).
    ///
    /// # Errors
    ///
    /// Validation errors for a count outside `1..=MAX_INSTALLMENTS`, negative
    /// inputs, a down payment at or above the total, or a financed amount
    /// below one cent per row.
    pub fn generate(input: &PlanInput) -> Result<Vec<ScheduledInstallment>, InstallmentError> {
        if input.count < 1 {
            return Err(InstallmentError::InvalidCount);
        }
        if input.count > MAX_INSTALLMENTS {
            return Err(InstallmentError::TooManyInstallments {
                count: input.count,
                max: MAX_INSTALLMENTS,
            });
        }
        if input.total_amount < Decimal::ZERO {
            return Err(InstallmentError::NegativeValue("Invoice total"));
        }
        if input.down_payment < Decimal::ZERO {
            return Err(InstallmentError::NegativeValue("Down payment"));
        }
        if input.interest_percent < Decimal::ZERO {
            return Err(InstallmentError::NegativeValue("Interest"));
        }
        if input.down_payment >= input.total_amount {
            return Err(InstallmentError::DownPaymentTooLarge);
        }

        let financed = Self::financed_amount(input);
        let interest = Self::interest_amount(input);
        let count = Decimal::from(input.count);
        let share = (financed / count)
            .round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::ToZero);
        if share <= Decimal::ZERO {
            return Err(InstallmentError::PlanTooSmall(input.count));
        }

        let mut rows = Vec::with_capacity(input.count as usize);
        let mut interest_spread = Decimal::ZERO;
        for i in 0..input.count {
            let due_date = input
                .start_date
                .checked_add_months(Months::new(i))
                .ok_or(InstallmentError::DateOutOfRange)?;
            let last = i + 1 == input.count;
            let amount = if last {
                financed - share * (count - Decimal::ONE)
            } else {
                share
            };
            let row_interest = if last {
                interest - interest_spread
            } else {
                (interest * amount / financed)
                    .round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::ToZero)
            };
            interest_spread += row_interest;
            let principal = amount - row_interest;
            if principal < Decimal::ZERO {
                return Err(InstallmentError::PlanTooSmall(input.count));
            }
            rows.push(ScheduledInstallment {
                sequence: i + 1,
                due_date,
                amount,
                principal,
            });
        }
        Ok(rows)
    }

    /// Checks that an installment can be collected and returns the amount still due.
    ///
    /// # Errors
    ///
    /// `AlreadyPaid` if the installment is paid.
    pub fn amount_due(
        id: Uuid,
        status: InstallmentStatus,
        amount: Decimal,
        amount_paid: Decimal,
    ) -> Result<Decimal, InstallmentError> {
        if status == InstallmentStatus::Paid || amount_paid >= amount {
            return Err(InstallmentError::AlreadyPaid(id));
        }
        Ok(amount - amount_paid)
    }

    /// Principal still owed on an installment; earlier collections settle principal first.
    #[must_use]
    pub fn principal_due(principal: Decimal, amount_paid: Decimal) -> Decimal {
        (principal - amount_paid).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan(total: Decimal, down: Decimal, count: u32, interest: Decimal) -> PlanInput {
        PlanInput {
            total_amount: total,
            down_payment: down,
            count,
            interest_percent: interest,
            start_date: date(2026, 1, 31),
        }
    }

    #[test]
    fn test_even_plan() {
        let rows =
            InstallmentScheduler::generate(&plan(dec!(1200), Decimal::ZERO, 12, Decimal::ZERO))
                .unwrap();
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.amount == dec!(100) && r.principal == dec!(100)));
        assert_eq!(rows.iter().map(|r| r.amount).sum::<Decimal>(), dec!(1200));
        assert_eq!(rows[0].due_date, date(2026, 1, 31));
        assert_eq!(rows[1].due_date, date(2026, 2, 28));
        assert_eq!(rows[2].due_date, date(2026, 3, 31));
        assert!(rows.windows(2).all(|w| w[0].due_date < w[1].due_date));
    }

    #[test]
    fn test_last_row_absorbs_remainder() {
        let rows =
            InstallmentScheduler::generate(&plan(dec!(100), Decimal::ZERO, 3, Decimal::ZERO))
                .unwrap();
        assert_eq!(rows[0].amount, dec!(33.33));
        assert_eq!(rows[1].amount, dec!(33.33));
        assert_eq!(rows[2].amount, dec!(33.34));
    }

    #[test]
    fn test_down_payment_and_interest() {
        let input = plan(dec!(1000), dec!(200), 4, dec!(10));
        assert_eq!(InstallmentScheduler::financed_amount(&input), dec!(880));
        assert_eq!(InstallmentScheduler::interest_amount(&input), dec!(80));
        let rows = InstallmentScheduler::generate(&input).unwrap();
        assert!(rows.iter().all(|r| r.amount == dec!(220)));
        assert!(rows.iter().all(|r| r.principal == dec!(200)));
    }

    #[test]
    fn test_interest_spread_sums_exactly() {
        let input = plan(dec!(100), Decimal::ZERO, 3, dec!(7));
        let rows = InstallmentScheduler::generate(&input).unwrap();
        let amounts: Decimal = rows.iter().map(|r| r.amount).sum();
        let principal: Decimal = rows.iter().map(|r| r.principal).sum();
        assert_eq!(amounts, dec!(107));
        assert_eq!(principal, dec!(100));
        assert!(rows.iter().all(|r| r.principal <= r.amount));
    }

    #[test]
    fn test_principal_due() {
        assert_eq!(InstallmentScheduler::principal_due(dec!(500), Decimal::ZERO), dec!(500));
        assert_eq!(InstallmentScheduler::principal_due(dec!(500), dec!(200)), dec!(300));
        assert_eq!(InstallmentScheduler::principal_due(dec!(500), dec!(520)), Decimal::ZERO);
    }

    #[rstest]
    #[case(plan(dec!(100), Decimal::ZERO, 0, Decimal::ZERO), "INVALID_INSTALLMENT_COUNT")]
    #[case(
        plan(dec!(1000000000), Decimal::ZERO, 4_000_000_000, Decimal::ZERO),
        "INVALID_INSTALLMENT_COUNT"
    )]
    #[case(plan(dec!(100000), Decimal::ZERO, 601, Decimal::ZERO), "INVALID_INSTALLMENT_COUNT")]
    #[case(plan(dec!(100), dec!(-1), 2, Decimal::ZERO), "NEGATIVE_VALUE")]
    #[case(plan(dec!(100), Decimal::ZERO, 2, dec!(-5)), "NEGATIVE_VALUE")]
    #[case(plan(dec!(100), dec!(100), 2, Decimal::ZERO), "DOWN_PAYMENT_TOO_LARGE")]
    #[case(plan(dec!(0.05), Decimal::ZERO, 10, Decimal::ZERO), "PLAN_TOO_SMALL")]
    fn test_rejected_plans(#[case] input: PlanInput, #[case] code: &str) {
        let err = InstallmentScheduler::generate(&input).unwrap_err();
        assert_eq!(err.error_code(), code);
    }

    #[rstest]
    #[case(date(2026, 1, 1), InstallmentStatus::Pending, true)]
    #[case(date(2026, 1, 1), InstallmentStatus::PartiallyPaid, true)]
    #[case(date(2026, 1, 1), InstallmentStatus::Paid, false)]
    #[case(date(2026, 2, 1), InstallmentStatus::Pending, false)]
    #[case(date(2026, 3, 1), InstallmentStatus::Pending, false)]
    fn test_is_overdue(
        #[case] due: NaiveDate,
        #[case] status: InstallmentStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(is_overdue(due, status, date(2026, 2, 1)), expected);
    }

    #[test]
    fn test_amount_due() {
        let id = Uuid::nil();
        let pending = InstallmentScheduler::amount_due(
            id,
            InstallmentStatus::Pending,
            dec!(100),
            Decimal::ZERO,
        );
        assert_eq!(pending.unwrap(), dec!(100));
        let partial = InstallmentScheduler::amount_due(
            id,
            InstallmentStatus::PartiallyPaid,
            dec!(100),
            dec!(40),
        );
        assert_eq!(partial.unwrap(), dec!(60));
        assert!(matches!(
            InstallmentScheduler::amount_due(id, InstallmentStatus::Paid, dec!(100), dec!(100)),
            Err(InstallmentError::AlreadyPaid(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Rows always sum to the financed amount and no row is zero or negative.
        #[test]
        fn prop_rows_sum_to_financed(
            total_cents in 10_000i64..10_000_000i64,
            down_pct in 0i64..90,
            count in 1u32..48,
            interest in 0i64..50,
        ) {
            let total = Decimal::new(total_cents, 2);
            let down = round_money(total * Decimal::new(down_pct, 2));
            let input = plan(total, down, count, Decimal::from(interest));
            let rows = InstallmentScheduler::generate(&input)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(rows.len(), count as usize);
            let sum: Decimal = rows.iter().map(|r| r.amount).sum();
            prop_assert_eq!(sum, InstallmentScheduler::financed_amount(&input));
            let principal: Decimal = rows.iter().map(|r| r.principal).sum();
            prop_assert_eq!(principal, InstallmentScheduler::principal_amount(&input));
            prop_assert!(rows.iter().all(|r| r.amount > Decimal::ZERO));
            prop_assert!(rows
                .iter()
                .all(|r| r.principal >= Decimal::ZERO && r.principal <= r.amount));
            prop_assert!(rows.windows(2).all(|w| w[0].due_date < w[1].due_date));
        }
    }
}
