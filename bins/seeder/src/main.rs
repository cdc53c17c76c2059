//! Demo tenant seeder for Tallybook development.
//!
//! Creates a tenant with an open fiscal year for the current calendar year,
//! the five role accounts, a few operating accounts and one customer and
//! supplier. Run the migrator first.
//!
//! Usage: cargo run --bin seeder

use anyhow::{Context, anyhow};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tallybook_api::LedgerApi;
use tallybook_core::chart::{AccountRole, AccountType};
use tallybook_db::TenantRepository;
use tallybook_db::repositories::CreateAccountInput;
use tallybook_shared::types::{TenantId, UserId};
use tallybook_shared::{AppConfig, OpResult, TenantContext};

/// Operating accounts created next to the role accounts.
const EXTRA_ACCOUNTS: &[(&str, &str, AccountType)] = &[
    ("1150", "Bank", AccountType::Asset),
    ("3100", "Owner's Capital", AccountType::Equity),
    ("5210", "Rent", AccountType::Expense),
    ("5220", "Utilities", AccountType::Expense),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tallybook=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = tallybook_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let tenant = TenantRepository::new(db.clone())
        .create_tenant("Demo Store")
        .await
        .context("Failed to create tenant")?;
    let ctx = TenantContext::new(TenantId::from_uuid(tenant.id), UserId::new());
    let api = LedgerApi::new(db, config.ledger.clone());

    let year = Utc::now().year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1).context("Invalid fiscal year start")?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).context("Invalid fiscal year end")?;
    let fiscal_year = ok(
        "fiscal year",
        api.create_fiscal_year(&ctx, &format!("FY{year}"), start, end).await,
    )?;
    info!(fiscal_year = %fiscal_year.name, "Seeded fiscal year");

    for role in AccountRole::ALL {
        let account = ok(role.as_str(), api.resolve_or_create_role_account(&ctx, role).await)?;
        info!(
            role = role.as_str(),
            code = %account.code,
            name = %account.name,
            "Seeded role account"
        );
    }

    for &(code, name, account_type) in EXTRA_ACCOUNTS {
        ok(
            name,
            api.create_account(&ctx, CreateAccountInput::new(code, name, account_type))
                .await,
        )?;
    }
    info!(count = EXTRA_ACCOUNTS.len(), "Seeded operating accounts");

    let customer = ok(
        "customer",
        api.create_customer(&ctx, "Walk-in Regular", Decimal::ZERO).await,
    )?;
    let supplier = ok(
        "supplier",
        api.create_supplier(&ctx, "Main Wholesaler", Decimal::ZERO).await,
    )?;
    info!(customer_id = %customer.id, supplier_id = %supplier.id, "Seeded parties");

    info!(tenant_id = %tenant.id, user_id = %ctx.user_id, "Seeding complete");
    Ok(())
}

/// Unwraps a seeding step, turning a failed result into an error.
fn ok<T>(step: &str, result: OpResult<T>) -> anyhow::Result<T> {
    match result.data {
        Some(data) if result.success => Ok(data),
        _ => Err(anyhow!(
            "Seeding {step} failed: {}",
            result.message.unwrap_or_default()
        )),
    }
}
