//! Ledger domain types for journal entry creation and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Journal entry lifecycle status.
///
/// `Draft → Posted` is the only transition; posted entries are immutable and
/// are corrected through reversing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Saved but not yet part of the books.
    Draft,
    /// Part of the books.
    Posted,
}

impl JournalStatus {
    /// Returns true if the entry affects balances and statements.
    #[must_use]
    pub const fn is_posted(self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// One requested journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit amount (zero if credit line).
    pub debit: Decimal,
    /// Credit amount (zero if debit line).
    pub credit: Decimal,
    /// Optional line memo.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// A debit line.
    #[must_use]
    pub const fn debit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// A credit line.
    #[must_use]
    pub const fn credit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Attaches a line memo.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJournalEntryInput {
    /// Fiscal year; when absent the tenant's year containing `entry_date` is used.
    pub fiscal_year_id: Option<Uuid>,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry description (required).
    pub description: String,
    /// Optional external reference (invoice number, voucher number, ...).
    pub reference: Option<String>,
    /// Requested status; posted unless a draft is asked for.
    pub status: JournalStatus,
    /// Lines; at least two.
    pub lines: Vec<JournalLineInput>,
}

impl CreateJournalEntryInput {
    /// A posted entry dated `entry_date` in whichever fiscal year contains it.
    #[must_use]
    pub fn posted(
        entry_date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<JournalLineInput>,
    ) -> Self {
        Self {
            fiscal_year_id: None,
            entry_date,
            description: description.into(),
            reference: None,
            status: JournalStatus::Posted,
            lines,
        }
    }

    /// Sets the external reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// A validated line ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLine {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub description: Option<String>,
}

/// Entry totals used for the balance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub difference: Decimal,
}

impl JournalTotals {
    /// Sums a set of lines.
    #[must_use]
    pub fn from_lines(lines: &[ResolvedLine]) -> Self {
        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        Self {
            total_debit,
            total_credit,
            difference: total_debit - total_credit,
        }
    }
}

/// Formats a per-tenant document number, e.g. `JE-000042`.
#[must_use]
pub fn document_number(prefix: &str, value: i64) -> String {
    format!("{prefix}-{value:06}")
}
