//! Operational tables read and written by the ledger core: parties,
//! shifts, invoices, vouchers and installments.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_ledger_core::{Accounts, JournalEntries, Tenants};
use super::{money, money_opt};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One open shift per (tenant, user). Partial unique indexes are spelled the
/// same on PostgreSQL and SQLite.
const OPEN_SHIFT_INDEX_SQL: &str =
    "CREATE UNIQUE INDEX uq_shifts_open_per_user ON shifts (tenant_id, user_id) WHERE status = 'open'";

fn tenant_fk<T: IntoIden + 'static>(table: T, column: T) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from(table, column)
        .to(Tenants::Table, Tenants::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [Parties::Customers, Parties::Suppliers] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .col(ColumnDef::new(Parties::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Parties::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Parties::Name).string_len(200).not_null())
                        .col(money(Parties::OpeningBalance))
                        .col(
                            ColumnDef::new(Parties::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(&mut tenant_fk(table, Parties::TenantId))
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .col(ColumnDef::new(Shifts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Shifts::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Shifts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Shifts::ShiftNumber).big_integer().not_null())
                    .col(ColumnDef::new(Shifts::StartTime).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Shifts::EndTime).timestamp_with_time_zone().null())
                    .col(money(Shifts::StartBalance))
                    .col(money_opt(Shifts::EndBalance))
                    .col(money_opt(Shifts::ExpectedCash))
                    .col(money_opt(Shifts::Variance))
                    .col(money_opt(Shifts::SystemCashBalance))
                    .col(money_opt(Shifts::SystemVisaBalance))
                    .col(money_opt(Shifts::SystemUnpaidBalance))
                    .col(ColumnDef::new(Shifts::Notes).text().null())
                    .col(ColumnDef::new(Shifts::Status).string_len(32).not_null())
                    .foreign_key(&mut tenant_fk(Shifts::Table, Shifts::TenantId))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_shifts_tenant_number")
                    .table(Shifts::Table)
                    .col(Shifts::TenantId)
                    .col(Shifts::ShiftNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .get_connection()
            .execute_unprepared(OPEN_SHIFT_INDEX_SQL)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Invoices::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Invoices::CustomerId).uuid().null())
                    .col(ColumnDef::new(Invoices::InvoiceNumber).string_len(50).not_null())
                    .col(ColumnDef::new(Invoices::IssueDate).date().not_null())
                    .col(money(Invoices::TotalAmount))
                    .col(money(Invoices::AmountPaid))
                    .col(ColumnDef::new(Invoices::PaymentStatus).string_len(32).not_null())
                    .col(ColumnDef::new(Invoices::PaymentMethod).string_len(32).not_null())
                    .col(ColumnDef::new(Invoices::ShiftId).uuid().null())
                    .col(ColumnDef::new(Invoices::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(&mut tenant_fk(Invoices::Table, Invoices::TenantId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invoices::Table, Invoices::CustomerId)
                            .to(Parties::Customers, Parties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invoices::Table, Invoices::ShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_tenant_customer")
                    .table(Invoices::Table)
                    .col(Invoices::TenantId)
                    .col(Invoices::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_shift")
                    .table(Invoices::Table)
                    .col(Invoices::ShiftId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseInvoices::Table)
                    .col(ColumnDef::new(PurchaseInvoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PurchaseInvoices::TenantId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseInvoices::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseInvoices::InvoiceNumber).string_len(50).not_null())
                    .col(ColumnDef::new(PurchaseInvoices::IssueDate).date().not_null())
                    .col(money(PurchaseInvoices::TotalAmount))
                    .col(money(PurchaseInvoices::AmountPaid))
                    .col(ColumnDef::new(PurchaseInvoices::PaymentStatus).string_len(32).not_null())
                    .col(
                        ColumnDef::new(PurchaseInvoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut tenant_fk(
                        PurchaseInvoices::Table,
                        PurchaseInvoices::TenantId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .from(PurchaseInvoices::Table, PurchaseInvoices::SupplierId)
                            .to(Parties::Suppliers, Parties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vouchers::Table)
                    .col(ColumnDef::new(Vouchers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vouchers::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Vouchers::VoucherNumber).string_len(32).not_null())
                    .col(ColumnDef::new(Vouchers::VoucherType).string_len(32).not_null())
                    .col(money(Vouchers::Amount))
                    .col(ColumnDef::new(Vouchers::VoucherDate).date().not_null())
                    .col(ColumnDef::new(Vouchers::PartyType).string_len(32).not_null())
                    .col(ColumnDef::new(Vouchers::PartyId).uuid().null())
                    .col(ColumnDef::new(Vouchers::AccountId).uuid().null())
                    .col(ColumnDef::new(Vouchers::Description).text().null())
                    .col(ColumnDef::new(Vouchers::ShiftId).uuid().null())
                    .col(ColumnDef::new(Vouchers::JournalEntryId).uuid().not_null())
                    .col(ColumnDef::new(Vouchers::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Vouchers::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(&mut tenant_fk(Vouchers::Table, Vouchers::TenantId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vouchers::Table, Vouchers::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vouchers::Table, Vouchers::ShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vouchers::Table, Vouchers::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_vouchers_tenant_number")
                    .table(Vouchers::Table)
                    .col(Vouchers::TenantId)
                    .col(Vouchers::VoucherNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_vouchers_tenant_party")
                    .table(Vouchers::Table)
                    .col(Vouchers::TenantId)
                    .col(Vouchers::PartyType)
                    .col(Vouchers::PartyId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_vouchers_shift")
                    .table(Vouchers::Table)
                    .col(Vouchers::ShiftId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Installments::Table)
                    .col(ColumnDef::new(Installments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Installments::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Installments::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Installments::InvoiceId).uuid().not_null())
                    .col(ColumnDef::new(Installments::Sequence).integer().not_null())
                    .col(ColumnDef::new(Installments::DueDate).date().not_null())
                    .col(money(Installments::Amount))
                    .col(money(Installments::Principal))
                    .col(money(Installments::AmountPaid))
                    .col(ColumnDef::new(Installments::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Installments::PaidDate).date().null())
                    .col(ColumnDef::new(Installments::JournalEntryId).uuid().null())
                    .col(
                        ColumnDef::new(Installments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut tenant_fk(Installments::Table, Installments::TenantId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Installments::Table, Installments::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Installments::Table, Installments::CustomerId)
                            .to(Parties::Customers, Parties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Installments::Table, Installments::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_installments_invoice_sequence")
                    .table(Installments::Table)
                    .col(Installments::InvoiceId)
                    .col(Installments::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_installments_tenant_due")
                    .table(Installments::Table)
                    .col(Installments::TenantId)
                    .col(Installments::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Installments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vouchers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseInvoices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shifts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parties::Suppliers).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parties::Customers).if_exists().to_owned())
            .await
    }
}

/// Customers and suppliers share one column layout.
#[derive(DeriveIden, Clone, Copy)]
enum Parties {
    Customers,
    Suppliers,
    Id,
    TenantId,
    Name,
    OpeningBalance,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Shifts {
    Table,
    Id,
    TenantId,
    UserId,
    ShiftNumber,
    StartTime,
    EndTime,
    StartBalance,
    EndBalance,
    ExpectedCash,
    Variance,
    SystemCashBalance,
    SystemVisaBalance,
    SystemUnpaidBalance,
    Notes,
    Status,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    TenantId,
    CustomerId,
    InvoiceNumber,
    IssueDate,
    TotalAmount,
    AmountPaid,
    PaymentStatus,
    PaymentMethod,
    ShiftId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PurchaseInvoices {
    Table,
    Id,
    TenantId,
    SupplierId,
    InvoiceNumber,
    IssueDate,
    TotalAmount,
    AmountPaid,
    PaymentStatus,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Vouchers {
    Table,
    Id,
    TenantId,
    VoucherNumber,
    VoucherType,
    Amount,
    VoucherDate,
    PartyType,
    PartyId,
    AccountId,
    Description,
    ShiftId,
    JournalEntryId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Installments {
    Table,
    Id,
    TenantId,
    CustomerId,
    InvoiceId,
    Sequence,
    DueDate,
    Amount,
    Principal,
    AmountPaid,
    Status,
    PaidDate,
    JournalEntryId,
    CreatedAt,
}
