//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database with the full schema.

#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use tallybook_db::migration::Migrator;
use tallybook_db::{FiscalRepository, TenantRepository};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fresh database on a single connection; `:memory:` is per-connection.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// A tenant with an open fiscal year covering 2026.
pub async fn setup_tenant(db: &DatabaseConnection, name: &str) -> Uuid {
    let tenant = TenantRepository::new(db.clone())
        .create_tenant(name)
        .await
        .unwrap();
    FiscalRepository::new(db.clone())
        .create_fiscal_year(tenant.id, "FY2026", date(2026, 1, 1), date(2026, 12, 31))
        .await
        .unwrap();
    tenant.id
}
