//! Property-based tests for LedgerService.
//!
//! - Balance integrity: accepted entries never differ by a cent or more
//! - Line count: fewer than two lines is always rejected
//! - Tenant scoping: an unresolvable account always fails the whole entry

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::service::{AccountInfo, LedgerService};
use super::types::{CreateJournalEntryInput, JournalLineInput};
use crate::chart::AccountType;
use tallybook_shared::types::BALANCE_TOLERANCE;

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_input(lines: Vec<JournalLineInput>) -> CreateJournalEntryInput {
    CreateJournalEntryInput::posted(
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        "Property entry",
        lines,
    )
}

fn ok_account(id: Uuid) -> Result<AccountInfo, LedgerError> {
    Ok(AccountInfo {
        id,
        account_type: AccountType::Asset,
    })
}

fn validate(input: &CreateJournalEntryInput) -> Result<(), LedgerError> {
    LedgerService::validate_and_resolve(input, BALANCE_TOLERANCE, 2, ok_account).map(|_| ())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced entries are accepted.
    #[test]
    fn prop_balanced_entry_accepted(amount in positive_amount()) {
        let input = make_input(vec![
            JournalLineInput::debit(Uuid::new_v4(), amount),
            JournalLineInput::credit(Uuid::new_v4(), amount),
        ]);
        prop_assert!(validate(&input).is_ok());
    }

    /// Any cent-level mismatch is rejected.
    #[test]
    fn prop_unbalanced_entry_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let input = make_input(vec![
            JournalLineInput::debit(Uuid::new_v4(), debit),
            JournalLineInput::credit(Uuid::new_v4(), credit),
        ]);
        let rejected = matches!(validate(&input), Err(LedgerError::Unbalanced { .. }));
        prop_assert!(rejected);
    }

    /// Split debits against one credit are accepted and totals agree.
    #[test]
    fn prop_split_lines_balance(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<JournalLineInput> = amounts
            .iter()
            .map(|a| JournalLineInput::debit(Uuid::new_v4(), *a))
            .collect();
        lines.push(JournalLineInput::credit(Uuid::new_v4(), total));
        let input = make_input(lines);

        let (_, totals) =
            LedgerService::validate_and_resolve(&input, BALANCE_TOLERANCE, 2, ok_account)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(totals.difference.abs() <= BALANCE_TOLERANCE);
        prop_assert_eq!(totals.total_debit, total);
    }

    /// Whatever the amounts, a lone line is never accepted.
    #[test]
    fn prop_single_line_rejected(amount in positive_amount()) {
        let input = make_input(vec![JournalLineInput::debit(Uuid::new_v4(), amount)]);
        let rejected = matches!(validate(&input), Err(LedgerError::InsufficientLines(1)));
        prop_assert!(rejected);
    }

    /// One foreign account poisons the whole entry.
    #[test]
    fn prop_foreign_account_not_found(amount in positive_amount(), foreign_index in 0usize..2) {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let foreign = ids[foreign_index];
        let input = make_input(vec![
            JournalLineInput::debit(ids[0], amount),
            JournalLineInput::credit(ids[1], amount),
        ]);
        let lookup = |id: Uuid| {
            if id == foreign {
                Err(LedgerError::AccountNotFound(id))
            } else {
                ok_account(id)
            }
        };
        let result = LedgerService::validate_and_resolve(&input, BALANCE_TOLERANCE, 2, lookup);
        let not_found = matches!(result, Err(LedgerError::AccountNotFound(id)) if id == foreign);
        prop_assert!(not_found);
    }
}
