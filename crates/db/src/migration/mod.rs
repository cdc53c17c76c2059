//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder, so they run on PostgreSQL and on SQLite alike.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_ledger_core;
mod m20260301_000002_operations;

/// Money column: 16 significant digits, 4 decimal places, defaulting to zero.
fn money<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).decimal_len(16, 4).not_null().default(0).to_owned()
}

/// Nullable money column, for values only known later (shift close).
fn money_opt<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).decimal_len(16, 4).null().to_owned()
}

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_ledger_core::Migration),
            Box::new(m20260301_000002_operations::Migration),
        ]
    }
}
