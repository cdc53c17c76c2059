//! Account balance folding.
//!
//! Balances are never stored; they are recomputed from journal lines:
//! - Debit-normal (asset, expense, customers): balance += debit - credit
//! - Credit-normal (liability, equity, revenue, suppliers): balance += credit - debit

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chart::NormalSide;

/// Running balance of one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Side that increases the balance.
    pub side: NormalSide,
    /// Total debit amount folded so far.
    pub debit_total: Decimal,
    /// Total credit amount folded so far.
    pub credit_total: Decimal,
    /// Current signed balance, opening included.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Starts from an opening balance.
    #[must_use]
    pub const fn opening(side: NormalSide, opening: Decimal) -> Self {
        Self {
            side,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: opening,
        }
    }

    /// Folds one movement and returns the new balance.
    pub fn apply(&mut self, debit: Decimal, credit: Decimal) -> Decimal {
        self.debit_total += debit;
        self.credit_total += credit;
        self.balance += self.side.delta(debit, credit);
        self.balance
    }

    /// Folds many movements.
    #[must_use]
    pub fn fold<I>(mut self, movements: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, Decimal)>,
    {
        for (debit, credit) in movements {
            self.apply(debit, credit);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_normal_fold() {
        let balance = AccountBalance::opening(NormalSide::Debit, dec!(1000))
            .fold([(dec!(200), dec!(0)), (dec!(0), dec!(50))]);
        assert_eq!(balance.balance, dec!(1150));
        assert_eq!(balance.debit_total, dec!(200));
        assert_eq!(balance.credit_total, dec!(50));
    }

    #[test]
    fn test_credit_normal_fold() {
        let balance =
            AccountBalance::opening(NormalSide::Credit, dec!(1000)).fold([(dec!(0), dec!(200))]);
        assert_eq!(balance.balance, dec!(1200));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Folding order does not change the closing balance.
        #[test]
        fn prop_fold_is_order_independent(
            moves in prop::collection::vec((0i64..1_000_000i64, 0i64..1_000_000i64), 0..20)
        ) {
            let movements: Vec<(Decimal, Decimal)> = moves
                .iter()
                .map(|(d, c)| (Decimal::new(*d, 2), Decimal::new(*c, 2)))
                .collect();
            let forward = AccountBalance::opening(NormalSide::Debit, Decimal::ZERO)
                .fold(movements.iter().copied());
            let backward = AccountBalance::opening(NormalSide::Debit, Decimal::ZERO)
                .fold(movements.iter().rev().copied());
            prop_assert_eq!(forward.balance, backward.balance);
            prop_assert_eq!(forward.balance, forward.debit_total - forward.credit_total);
        }
    }
}
