//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Portable migrations (PostgreSQL in production, SQLite in tests)
//! - Repositories that run every stateful ledger operation inside one
//!   storage transaction, always filtered by tenant

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use error::{RepoError, RepoResult};
pub use repositories::{
    AccountFilter, AccountRepository, ClosedShift, CollectedInstallment, CreateAccountInput,
    CreatePlanInput, FiscalRepository, InstallmentFilter, InstallmentRepository, InstallmentView,
    InvoiceRepository, JournalEntryWithLines, JournalFilter, JournalRepository, PartyRecord,
    PartyRepository, PostVoucherInput, PostedVoucher, RecordPurchaseInput, RecordSaleInput,
    ShiftRepository, StatementRepository, TenantRepository, VoucherRepository,
};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tallybook_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection sized from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
