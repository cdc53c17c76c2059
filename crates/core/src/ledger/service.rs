//! Ledger service for journal entry validation and resolution.
//!
//! Pure business logic with no database dependencies. The repository loads
//! the tenant's accounts and hands a lookup closure in, so an account of
//! another tenant simply fails to resolve.

use rust_decimal::Decimal;
use uuid::Uuid;

use tallybook_shared::types::is_within_tolerance;

use super::error::LedgerError;
use super::types::{CreateJournalEntryInput, JournalStatus, JournalTotals, ResolvedLine};
use crate::chart::AccountType;

/// Information about an account needed for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: Uuid,
    /// The account type.
    pub account_type: AccountType,
}

/// Ledger service for journal entry validation.
pub struct LedgerService;

impl LedgerService {
    /// Validate and resolve a journal entry before persisting.
    ///
    /// Steps:
    /// 1. At least 2 lines and a non-blank description
    /// 2. Each line: non-negative, exactly one side set, within currency precision
    /// 3. Each account resolves inside the tenant
    /// 4. At least one debit and one credit
    /// 5. `|debit - credit|` strictly below `tolerance`
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn validate_and_resolve<A>(
        input: &CreateJournalEntryInput,
        tolerance: Decimal,
        currency_decimals: u32,
        account_lookup: A,
    ) -> Result<(Vec<ResolvedLine>, JournalTotals), LedgerError>
    where
        A: Fn(Uuid) -> Result<AccountInfo, LedgerError>,
    {
        if input.lines.len() < 2 {
            return Err(LedgerError::InsufficientLines(input.lines.len()));
        }
        if input.description.trim().is_empty() {
            return Err(LedgerError::MissingDescription);
        }

        let mut resolved = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
                return Err(LedgerError::NegativeAmount);
            }
            match (line.debit.is_zero(), line.credit.is_zero()) {
                (true, true) => return Err(LedgerError::EmptyLine(line.account_id)),
                (false, false) => return Err(LedgerError::BothSides(line.account_id)),
                _ => {}
            }
            for amount in [line.debit, line.credit] {
                if amount.normalize().scale() > currency_decimals {
                    return Err(LedgerError::ExcessPrecision(amount));
                }
            }

            let account = account_lookup(line.account_id)?;
            resolved.push(ResolvedLine {
                account_id: account.id,
                debit: line.debit,
                credit: line.credit,
                description: line
                    .description
                    .as_ref()
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
            });
        }

        let totals = JournalTotals::from_lines(&resolved);
        if totals.total_debit.is_zero() || totals.total_credit.is_zero() {
            return Err(LedgerError::OneSided);
        }
        if !is_within_tolerance(totals.total_debit, totals.total_credit, tolerance) {
            return Err(LedgerError::Unbalanced {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok((resolved, totals))
    }

    /// Validate a draft → posted transition.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPosted` if the entry is posted.
    pub fn validate_can_post(entry_id: Uuid, status: JournalStatus) -> Result<(), LedgerError> {
        match status {
            JournalStatus::Draft => Ok(()),
            JournalStatus::Posted => Err(LedgerError::AlreadyPosted(entry_id)),
        }
    }

    /// Validate that an entry may be reversed.
    ///
    /// # Errors
    ///
    /// Drafts cannot be reversed; an entry is reversed at most once.
    pub fn validate_can_reverse(
        entry_id: Uuid,
        status: JournalStatus,
        already_reversed: bool,
    ) -> Result<(), LedgerError> {
        if !status.is_posted() {
            return Err(LedgerError::CannotReverseDraft);
        }
        if already_reversed {
            return Err(LedgerError::AlreadyReversed(entry_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::JournalLineInput;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

    fn any_account(id: Uuid) -> Result<AccountInfo, LedgerError> {
        Ok(AccountInfo {
            id,
            account_type: AccountType::Asset,
        })
    }

    fn input(lines: Vec<JournalLineInput>) -> CreateJournalEntryInput {
        CreateJournalEntryInput::posted(
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            "Test entry",
            lines,
        )
    }

    #[test]
    fn test_balanced_entry_resolves() {
        let (cash, revenue) = (Uuid::new_v4(), Uuid::new_v4());
        let entry = input(vec![
            JournalLineInput::debit(cash, dec!(100)),
            JournalLineInput::credit(revenue, dec!(60)).with_description("  part 1 "),
            JournalLineInput::credit(revenue, dec!(40)).with_description("   "),
        ]);

        let (lines, totals) =
            LedgerService::validate_and_resolve(&entry, TOLERANCE, 2, any_account).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].description.as_deref(), Some("part 1"));
        assert!(lines[2].description.is_none());
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(totals.total_credit, dec!(100));
    }

    #[test]
    fn test_one_cent_off_is_rejected() {
        let entry = input(vec![
            JournalLineInput::debit(Uuid::new_v4(), dec!(100)),
            JournalLineInput::credit(Uuid::new_v4(), dec!(99.99)),
        ]);
        let err =
            LedgerService::validate_and_resolve(&entry, TOLERANCE, 2, any_account).unwrap_err();
        assert!(matches!(err, LedgerError::Unbalanced { .. }));
    }

    #[test]
    fn test_sub_cent_difference_is_accepted_with_precision() {
        let entry = input(vec![
            JournalLineInput::debit(Uuid::new_v4(), dec!(100.0005)),
            JournalLineInput::credit(Uuid::new_v4(), dec!(100)),
        ]);
        assert!(LedgerService::validate_and_resolve(&entry, TOLERANCE, 4, any_account).is_ok());
    }

    #[test]
    fn test_single_line_rejected() {
        let entry = input(vec![JournalLineInput::debit(Uuid::new_v4(), dec!(1))]);
        let err =
            LedgerService::validate_and_resolve(&entry, TOLERANCE, 2, any_account).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientLines(1)));
    }

    #[test]
    fn test_blank_description_rejected() {
        let mut entry = input(vec![
            JournalLineInput::debit(Uuid::new_v4(), dec!(1)),
            JournalLineInput::credit(Uuid::new_v4(), dec!(1)),
        ]);
        entry.description = "  ".into();
        let err =
            LedgerService::validate_and_resolve(&entry, TOLERANCE, 2, any_account).unwrap_err();
        assert!(matches!(err, LedgerError::MissingDescription));
    }

    #[test]
    fn test_line_shape_rules() {
        let id = Uuid::new_v4();
        let negative = input(vec![
            JournalLineInput::debit(id, dec!(-1)),
            JournalLineInput::credit(id, dec!(-1)),
        ]);
        assert!(matches!(
            LedgerService::validate_and_resolve(&negative, TOLERANCE, 2, any_account),
            Err(LedgerError::NegativeAmount)
        ));

        let empty = input(vec![
            JournalLineInput::debit(id, Decimal::ZERO),
            JournalLineInput::credit(id, dec!(1)),
        ]);
        assert!(matches!(
            LedgerService::validate_and_resolve(&empty, TOLERANCE, 2, any_account),
            Err(LedgerError::EmptyLine(_))
        ));

        let mut both = JournalLineInput::debit(id, dec!(1));
        both.credit = dec!(1);
        let both = input(vec![both, JournalLineInput::credit(id, dec!(1))]);
        assert!(matches!(
            LedgerService::validate_and_resolve(&both, TOLERANCE, 2, any_account),
            Err(LedgerError::BothSides(_))
        ));
    }

    #[test]
    fn test_excess_precision_rejected() {
        let entry = input(vec![
            JournalLineInput::debit(Uuid::new_v4(), dec!(10.005)),
            JournalLineInput::credit(Uuid::new_v4(), dec!(10.005)),
        ]);
        assert!(matches!(
            LedgerService::validate_and_resolve(&entry, TOLERANCE, 2, any_account),
            Err(LedgerError::ExcessPrecision(_))
        ));
    }

    #[test]
    fn test_trailing_zeros_are_not_excess_precision() {
        let entry = input(vec![
            JournalLineInput::debit(Uuid::new_v4(), dec!(10.5000)),
            JournalLineInput::credit(Uuid::new_v4(), dec!(10.50)),
        ]);
        assert!(LedgerService::validate_and_resolve(&entry, TOLERANCE, 2, any_account).is_ok());
    }

    #[test]
    fn test_one_sided_rejected() {
        let entry = input(vec![
            JournalLineInput::debit(Uuid::new_v4(), dec!(0.001)),
            JournalLineInput::debit(Uuid::new_v4(), dec!(0.001)),
        ]);
        assert!(matches!(
            LedgerService::validate_and_resolve(&entry, TOLERANCE, 4, any_account),
            Err(LedgerError::OneSided)
        ));
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        let known = Uuid::new_v4();
        let foreign = Uuid::new_v4();
        let entry = input(vec![
            JournalLineInput::debit(known, dec!(5)),
            JournalLineInput::credit(foreign, dec!(5)),
        ]);
        let lookup = |id: Uuid| {
            if id == known {
                any_account(id)
            } else {
                Err(LedgerError::AccountNotFound(id))
            }
        };
        let err = LedgerService::validate_and_resolve(&entry, TOLERANCE, 2, lookup).unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(id) if id == foreign));
    }

    #[test]
    fn test_post_and_reverse_guards() {
        let id = Uuid::new_v4();
        assert!(LedgerService::validate_can_post(id, JournalStatus::Draft).is_ok());
        assert!(matches!(
            LedgerService::validate_can_post(id, JournalStatus::Posted),
            Err(LedgerError::AlreadyPosted(_))
        ));
        assert!(LedgerService::validate_can_reverse(id, JournalStatus::Posted, false).is_ok());
        assert!(matches!(
            LedgerService::validate_can_reverse(id, JournalStatus::Posted, true),
            Err(LedgerError::AlreadyReversed(_))
        ));
        assert!(matches!(
            LedgerService::validate_can_reverse(id, JournalStatus::Draft, false),
            Err(LedgerError::CannotReverseDraft)
        ));
    }
}
