//! Cash-drawer shifts: `open → closed`, with expected-vs-counted reconciliation.

pub mod error;
pub mod reconcile;
pub mod types;

pub use error::ShiftError;
pub use reconcile::ShiftService;
pub use types::{CashVoucherFact, Reconciliation, SaleFact, ShiftStatus, ShiftSummary};
