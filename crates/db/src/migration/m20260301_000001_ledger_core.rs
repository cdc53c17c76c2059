//! Ledger core schema: tenants, fiscal years, chart of accounts, role
//! mappings, document sequences, journal entries and lines.

use sea_orm_migration::prelude::*;

use super::money;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenants::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Tenants::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FiscalYears::Table)
                    .col(ColumnDef::new(FiscalYears::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FiscalYears::TenantId).uuid().not_null())
                    .col(ColumnDef::new(FiscalYears::Name).string_len(100).not_null())
                    .col(ColumnDef::new(FiscalYears::StartDate).date().not_null())
                    .col(ColumnDef::new(FiscalYears::EndDate).date().not_null())
                    .col(ColumnDef::new(FiscalYears::Status).string_len(32).not_null())
                    .col(
                        ColumnDef::new(FiscalYears::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FiscalYears::Table, FiscalYears::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_fiscal_years_tenant_dates")
                    .table(FiscalYears::Table)
                    .col(FiscalYears::TenantId)
                    .col(FiscalYears::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Code).string_len(30).not_null())
                    .col(ColumnDef::new(Accounts::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(32).not_null())
                    .col(ColumnDef::new(Accounts::ParentId).uuid().null())
                    .col(ColumnDef::new(Accounts::PartyType).string_len(32).null())
                    .col(ColumnDef::new(Accounts::PartyId).uuid().null())
                    .col(money(Accounts::OpeningBalance))
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Accounts::Table, Accounts::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_accounts_tenant_code")
                    .table(Accounts::Table)
                    .col(Accounts::TenantId)
                    .col(Accounts::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_accounts_tenant_party")
                    .table(Accounts::Table)
                    .col(Accounts::TenantId)
                    .col(Accounts::PartyType)
                    .col(Accounts::PartyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountRoles::Table)
                    .col(ColumnDef::new(AccountRoles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AccountRoles::TenantId).uuid().not_null())
                    .col(ColumnDef::new(AccountRoles::Role).string_len(32).not_null())
                    .col(ColumnDef::new(AccountRoles::AccountId).uuid().not_null())
                    .col(ColumnDef::new(AccountRoles::Version).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(AccountRoles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccountRoles::Table, AccountRoles::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccountRoles::Table, AccountRoles::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_account_roles_tenant_role")
                    .table(AccountRoles::Table)
                    .col(AccountRoles::TenantId)
                    .col(AccountRoles::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentSequences::Table)
                    .col(ColumnDef::new(DocumentSequences::TenantId).uuid().not_null())
                    .col(ColumnDef::new(DocumentSequences::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(DocumentSequences::LastValue).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(DocumentSequences::TenantId)
                            .col(DocumentSequences::Kind),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DocumentSequences::Table, DocumentSequences::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .col(ColumnDef::new(JournalEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntries::TenantId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::FiscalYearId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryNumber).string_len(32).not_null())
                    .col(ColumnDef::new(JournalEntries::Sequence).big_integer().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::Reference).string_len(100).null())
                    .col(ColumnDef::new(JournalEntries::Status).string_len(32).not_null())
                    .col(ColumnDef::new(JournalEntries::ReversalOf).uuid().null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalEntries::Table, JournalEntries::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalEntries::Table, JournalEntries::FiscalYearId)
                            .to(FiscalYears::Table, FiscalYears::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalEntries::Table, JournalEntries::ReversalOf)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uq_journal_entries_tenant_number")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::EntryNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;
        // An entry is reversed at most once.
        manager
            .create_index(
                Index::create()
                    .name("uq_journal_entries_reversal_of")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::ReversalOf)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_tenant_date")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .col(ColumnDef::new(JournalLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalLines::JournalEntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::AccountId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::LineNo).integer().not_null())
                    .col(money(JournalLines::Debit))
                    .col(money(JournalLines::Credit))
                    .col(ColumnDef::new(JournalLines::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalLines::Table, JournalLines::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(JournalLines::Table, JournalLines::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_account")
                    .table(JournalLines::Table)
                    .col(JournalLines::AccountId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_entry")
                    .table(JournalLines::Table)
                    .col(JournalLines::JournalEntryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalLines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentSequences::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountRoles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FiscalYears::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Tenants {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FiscalYears {
    Table,
    Id,
    TenantId,
    Name,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Accounts {
    Table,
    Id,
    TenantId,
    Code,
    Name,
    AccountType,
    ParentId,
    PartyType,
    PartyId,
    OpeningBalance,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AccountRoles {
    Table,
    Id,
    TenantId,
    Role,
    AccountId,
    Version,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DocumentSequences {
    Table,
    TenantId,
    Kind,
    LastValue,
}

#[derive(DeriveIden)]
pub(super) enum JournalEntries {
    Table,
    Id,
    TenantId,
    FiscalYearId,
    EntryNumber,
    Sequence,
    EntryDate,
    Description,
    Reference,
    Status,
    ReversalOf,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalLines {
    Table,
    Id,
    JournalEntryId,
    AccountId,
    LineNo,
    Debit,
    Credit,
    Description,
}
