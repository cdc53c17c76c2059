//! Running-balance statements for an account or a business party.
//!
//! This module provides pure business logic:
//! - Normalized statement rows from journal lines, invoices and vouchers
//! - Deterministic ordering
//! - Opening balance policies
//! - Running balance folding and totals

pub mod error;
pub mod party;
pub mod service;
pub mod types;

pub use error::StatementError;
pub use party::{InstallmentFact, InvoiceFact, VoucherFact, customer_rows, supplier_rows};
pub use service::StatementService;
pub use types::{
    DateRange, OpeningBalancePolicy, RowSource, Statement, StatementLine, StatementRow,
    StatementSubject,
};
