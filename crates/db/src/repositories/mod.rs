//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped by tenant; multi-row writes run in one transaction.

pub mod account;
pub mod fiscal;
pub mod installment;
pub mod invoice;
pub mod journal;
pub mod party;
pub(crate) mod sequence;
pub mod shift;
pub mod statement;
pub mod tenant;
pub mod voucher;

pub use account::{AccountFilter, AccountRepository, CreateAccountInput};
pub use fiscal::FiscalRepository;
pub use installment::{
    CollectedInstallment, CreatePlanInput, InstallmentFilter, InstallmentRepository,
    InstallmentView,
};
pub use invoice::{InvoiceRepository, RecordPurchaseInput, RecordSaleInput};
pub use journal::{JournalEntryWithLines, JournalFilter, JournalRepository};
pub use party::{PartyRecord, PartyRepository};
pub use shift::{ClosedShift, ShiftRepository};
pub use statement::StatementRepository;
pub use tenant::TenantRepository;
pub use voucher::{PostVoucherInput, PostedVoucher, VoucherRepository};
