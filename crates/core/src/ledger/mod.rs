//! Double-entry bookkeeping logic.
//!
//! This module implements the pure half of the posting engine:
//! - Journal line validation and balance checks
//! - Normal-side balance folding
//! - Fiscal year posting rules
//! - Voucher-to-journal orientation
//! - Reversing entries

pub mod balance;
pub mod error;
pub mod fiscal;
pub mod reversal;
pub mod service;
pub mod types;
pub mod voucher;

#[cfg(test)]
mod service_props;

pub use balance::AccountBalance;
pub use error::LedgerError;
pub use fiscal::{FiscalYearInfo, FiscalYearStatus, find_fiscal_year, validate_new_year};
pub use reversal::ReversalService;
pub use service::{AccountInfo, LedgerService};
pub use types::{
    CreateJournalEntryInput, JournalLineInput, JournalStatus, JournalTotals, ResolvedLine,
    document_number,
};
pub use voucher::{Counterparty, VoucherType, validate_voucher_amount};
