//! Statement domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StatementError;
use crate::chart::{NormalSide, PartyType};

/// What a statement is drawn up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementSubject {
    /// A ledger account.
    Account {
        /// Account id.
        account_id: Uuid,
    },
    /// A customer or supplier.
    Party {
        /// Customer or supplier.
        party_type: PartyType,
        /// Party id.
        party_id: Uuid,
    },
}

/// Inclusive reporting window; open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a validated range.
    ///
    /// # Errors
    ///
    /// `InvalidRange` if `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, StatementError> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    /// Checks `from <= to`.
    ///
    /// # Errors
    ///
    /// `InvalidRange` if `from > to`.
    pub fn validate(&self) -> Result<(), StatementError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(StatementError::InvalidRange { from, to }),
            _ => Ok(()),
        }
    }

    /// True if `date` is before the window.
    #[must_use]
    pub fn is_before(&self, date: NaiveDate) -> bool {
        self.from.is_some_and(|from| date < from)
    }

    /// True if `date` is after the window.
    #[must_use]
    pub fn is_after(&self, date: NaiveDate) -> bool {
        self.to.is_some_and(|to| date > to)
    }
}

/// How the opening balance of the window is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningBalancePolicy {
    /// The subject's stored opening balance, as is.
    #[default]
    Stored,
    /// Stored opening balance plus every movement dated before the window.
    CarryForward,
}

/// Where a statement row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSource {
    /// A posted journal line.
    JournalLine,
    /// A sales invoice.
    Invoice,
    /// Amount settled when the sales invoice was issued.
    InvoicePayment,
    /// A purchase invoice.
    PurchaseInvoice,
    /// Amount settled when the purchase invoice was recorded.
    PurchasePayment,
    /// A receipt or payment voucher.
    Voucher,
    /// A collected installment.
    Installment,
    /// Interest charged by an installment plan.
    PlanInterest,
}

/// A normalized ledger-affecting row before folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Accounting date.
    pub date: NaiveDate,
    /// Insertion order within the source; breaks ties between equal dates.
    pub sequence: i64,
    /// Source row id; final tiebreak.
    pub id: Uuid,
    /// Source kind.
    pub source: RowSource,
    /// Document reference (entry, invoice or voucher number).
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// A folded statement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Accounting date.
    pub date: NaiveDate,
    /// Source row id.
    pub id: Uuid,
    /// Source kind.
    pub source: RowSource,
    /// Document reference.
    pub reference: Option<String>,
    /// Description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this row.
    pub balance: Decimal,
}

/// A complete statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Subject.
    pub subject: StatementSubject,
    /// Balance side of the subject.
    pub normal_side: NormalSide,
    /// Window.
    pub range: DateRange,
    /// Balance before the first row.
    pub opening_balance: Decimal,
    /// Rows in chronological order.
    pub lines: Vec<StatementLine>,
    /// Sum of debits in the window.
    pub total_debit: Decimal,
    /// Sum of credits in the window.
    pub total_credit: Decimal,
    /// Closing balance (opening folded with every row).
    pub net_balance: Decimal,
}
