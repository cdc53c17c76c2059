//! Voucher-to-journal translation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use super::types::JournalLineInput;
use crate::chart::PartyType;

/// Cash-affecting voucher kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    /// Cash in.
    Receipt,
    /// Cash out.
    Payment,
}

impl VoucherType {
    /// Number prefix used for the per-tenant voucher sequence.
    #[must_use]
    pub const fn number_prefix(self) -> &'static str {
        match self {
            Self::Receipt => "RV",
            Self::Payment => "PV",
        }
    }

    /// Builds the two voucher lines.
    ///
    /// Receipt: debit cash, credit counter-account.
    /// Payment: debit counter-account, credit cash.
    #[must_use]
    pub fn journal_lines(
        self,
        cash_account: Uuid,
        counter_account: Uuid,
        amount: Decimal,
    ) -> Vec<JournalLineInput> {
        match self {
            Self::Receipt => vec![
                JournalLineInput::debit(cash_account, amount),
                JournalLineInput::credit(counter_account, amount),
            ],
            Self::Payment => vec![
                JournalLineInput::debit(counter_account, amount),
                JournalLineInput::credit(cash_account, amount),
            ],
        }
    }
}

/// Who the voucher settles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Counterparty {
    /// A customer or supplier; posts to the party's sub-ledger account.
    Party {
        /// Customer or supplier.
        party_type: PartyType,
        /// Party id.
        party_id: Uuid,
    },
    /// An explicit counter-account.
    Account(Uuid),
}

impl Counterparty {
    /// Builds the counterparty from the loose voucher fields.
    ///
    /// # Errors
    ///
    /// `MissingCounterparty` when the id matching `party_type` is absent.
    pub fn from_parts(
        party_type: PartyType,
        party_id: Option<Uuid>,
        account_id: Option<Uuid>,
    ) -> Result<Self, LedgerError> {
        match party_type {
            PartyType::Customer | PartyType::Supplier => party_id
                .map(|party_id| Self::Party {
                    party_type,
                    party_id,
                })
                .ok_or(LedgerError::MissingCounterparty("party id")),
            PartyType::Other => account_id
                .map(Self::Account)
                .ok_or(LedgerError::MissingCounterparty("account id")),
        }
    }

    /// Party type stored on the voucher row.
    #[must_use]
    pub const fn party_type(&self) -> PartyType {
        match self {
            Self::Party { party_type, .. } => *party_type,
            Self::Account(_) => PartyType::Other,
        }
    }
}

/// Checks that a voucher amount is positive.
///
/// # Errors
///
/// `InvalidVoucherAmount` for zero or negative amounts.
pub fn validate_voucher_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidVoucherAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_receipt_debits_cash() {
        let (cash, counter) = (Uuid::new_v4(), Uuid::new_v4());
        let lines = VoucherType::Receipt.journal_lines(cash, counter, dec!(500));
        assert_eq!(lines[0], JournalLineInput::debit(cash, dec!(500)));
        assert_eq!(lines[1], JournalLineInput::credit(counter, dec!(500)));
    }

    #[test]
    fn test_payment_credits_cash() {
        let (cash, counter) = (Uuid::new_v4(), Uuid::new_v4());
        let lines = VoucherType::Payment.journal_lines(cash, counter, dec!(50));
        assert_eq!(lines[0], JournalLineInput::debit(counter, dec!(50)));
        assert_eq!(lines[1], JournalLineInput::credit(cash, dec!(50)));
    }

    #[test]
    fn test_counterparty_requires_matching_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            Counterparty::from_parts(PartyType::Customer, Some(id), None).unwrap(),
            Counterparty::Party {
                party_type: PartyType::Customer,
                party_id: id
            }
        );
        assert_eq!(
            Counterparty::from_parts(PartyType::Other, None, Some(id)).unwrap(),
            Counterparty::Account(id)
        );
        assert!(matches!(
            Counterparty::from_parts(PartyType::Supplier, None, Some(id)),
            Err(LedgerError::MissingCounterparty(_))
        ));
        assert!(matches!(
            Counterparty::from_parts(PartyType::Other, Some(id), None),
            Err(LedgerError::MissingCounterparty(_))
        ));
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(validate_voucher_amount(dec!(0.01)).is_ok());
        assert!(validate_voucher_amount(Decimal::ZERO).is_err());
        assert!(validate_voucher_amount(dec!(-5)).is_err());
    }
}
