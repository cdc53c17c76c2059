//! Installment plans: schedule generation, collection rules and the overdue
//! predicate.

pub mod error;
pub mod schedule;
pub mod types;

pub use error::InstallmentError;
pub use schedule::{InstallmentScheduler, MAX_INSTALLMENTS, is_overdue};
pub use types::{InstallmentStatus, PlanInput, ScheduledInstallment};
