//! In-process ledger surface.
//!
//! [`LedgerApi`] is what the sales, purchasing and cash-desk modules call.
//! Every method takes the caller's [`TenantContext`] and returns an
//! [`OpResult`]: business failures come back as `{success: false}` and are
//! never raised as `Err`.

pub mod operations;

use sea_orm::DatabaseConnection;
use tracing::{error, warn};

use tallybook_db::{
    AccountRepository, FiscalRepository, InstallmentRepository, InvoiceRepository,
    JournalRepository, PartyRepository, RepoResult, ShiftRepository, StatementRepository,
    VoucherRepository,
};
use tallybook_shared::config::LedgerConfig;
use tallybook_shared::{AppConfig, AppError, AppResult, OpResult, TenantContext};

/// Repositories shared by every operation.
#[derive(Debug, Clone)]
pub struct LedgerApi {
    accounts: AccountRepository,
    fiscal: FiscalRepository,
    parties: PartyRepository,
    journal: JournalRepository,
    vouchers: VoucherRepository,
    invoices: InvoiceRepository,
    installments: InstallmentRepository,
    statements: StatementRepository,
    shifts: ShiftRepository,
}

impl LedgerApi {
    /// Builds the surface over an existing connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            fiscal: FiscalRepository::new(db.clone()),
            parties: PartyRepository::new(db.clone()),
            journal: JournalRepository::with_config(db.clone(), ledger.clone()),
            vouchers: VoucherRepository::with_config(db.clone(), ledger.clone()),
            invoices: InvoiceRepository::new(db.clone()),
            installments: InstallmentRepository::with_config(db.clone(), ledger),
            statements: StatementRepository::new(db.clone()),
            shifts: ShiftRepository::new(db),
        }
    }

    /// Connects to the configured database.
    ///
    /// # Errors
    ///
    /// `Infrastructure` if the pool cannot be established.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let db = tallybook_db::connect_with(&config.database)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to connect to database");
                AppError::Infrastructure(e.to_string())
            })?;
        Ok(Self::new(db, config.ledger.clone()))
    }
}

/// Folds a repository result into the uniform result shape.
///
/// Business failures are logged at `warn`, infrastructure faults at `error`.
fn respond<T>(operation: &'static str, ctx: &TenantContext, result: RepoResult<T>) -> OpResult<T> {
    match result {
        Ok(data) => OpResult::ok(data),
        Err(err) => {
            let code = err.error_code();
            let app = AppError::from(err);
            if app.is_business() {
                warn!(
                    operation,
                    tenant_id = %ctx.tenant_id,
                    user_id = %ctx.user_id,
                    code,
                    message = app.message(),
                    "Operation rejected"
                );
            } else {
                error!(
                    operation,
                    tenant_id = %ctx.tenant_id,
                    user_id = %ctx.user_id,
                    code,
                    message = app.message(),
                    "Operation failed"
                );
            }
            OpResult::fail(&app)
        }
    }
}
