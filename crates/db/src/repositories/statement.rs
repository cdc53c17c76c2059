//! Statement repository: gathers ledger-affecting rows and folds them.
//!
//! Account statements read posted journal lines. Party statements are built
//! from the documents themselves (invoices, collected installments and
//! vouchers), so they stay correct for sales recorded without a journal.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use tallybook_core::chart::{AccountType, ChartError, NormalSide, PartyType};
use tallybook_core::statement::{
    DateRange, InstallmentFact, InvoiceFact, OpeningBalancePolicy, RowSource, Statement,
    StatementError, StatementRow, StatementService, StatementSubject, VoucherFact, customer_rows,
    supplier_rows,
};

use crate::entities::{
    installments, invoices, journal_entries, journal_lines, purchase_invoices,
    sea_orm_active_enums, vouchers,
};
use crate::error::{RepoError, RepoResult};
use crate::repositories::{account, party, voucher};

/// Statement repository.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the statement of an account or a party over a window.
    ///
    /// # Errors
    ///
    /// - `InvalidRange` when `from > to`
    /// - `InvalidSubject` for a party of type `Other`
    /// - `AccountNotFound` / `PartyNotFound` for unknown or cross-tenant ids
    pub async fn get_statement(
        &self,
        tenant_id: Uuid,
        subject: StatementSubject,
        range: DateRange,
        policy: OpeningBalancePolicy,
    ) -> RepoResult<Statement> {
        range.validate()?;

        let (side, stored_opening, rows) = match subject {
            StatementSubject::Account { account_id } => {
                account_rows(&self.db, tenant_id, account_id, range, policy).await?
            }
            StatementSubject::Party {
                party_type,
                party_id,
            } => party_statement_rows(&self.db, tenant_id, party_type, party_id).await?,
        };

        let statement =
            StatementService::build(subject, side, stored_opening, policy, range, rows);
        tracing::debug!(
            tenant_id = %tenant_id,
            lines = statement.lines.len(),
            net_balance = %statement.net_balance,
            "Statement built"
        );
        Ok(statement)
    }
}

type SubjectRows = (NormalSide, Decimal, Vec<StatementRow>);

/// A journal line joined with its entry header.
#[derive(Debug, FromQueryResult)]
struct AccountLineRow {
    id: Uuid,
    debit: Decimal,
    credit: Decimal,
    description: Option<String>,
    entry_date: NaiveDate,
    entry_sequence: i64,
    entry_number: String,
    entry_description: String,
}

async fn account_rows<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    account_id: Uuid,
    range: DateRange,
    policy: OpeningBalancePolicy,
) -> RepoResult<SubjectRows> {
    let account = account::find_account(conn, tenant_id, account_id)
        .await?
        .ok_or(StatementError::AccountNotFound(account_id))?;

    let side = match account.party_type {
        Some(party_type) if party_type != sea_orm_active_enums::PartyType::Other => {
            PartyType::from(party_type).normal_side()
        }
        _ => AccountType::from(account.account_type).normal_side(),
    };

    let mut query = journal_lines::Entity::find()
        .select_only()
        .column(journal_lines::Column::Id)
        .column(journal_lines::Column::Debit)
        .column(journal_lines::Column::Credit)
        .column(journal_lines::Column::Description)
        .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntries.def())
        .column_as(journal_entries::Column::EntryDate, "entry_date")
        .column_as(journal_entries::Column::Sequence, "entry_sequence")
        .column_as(journal_entries::Column::EntryNumber, "entry_number")
        .column_as(journal_entries::Column::Description, "entry_description")
        .filter(journal_lines::Column::AccountId.eq(account_id))
        .filter(journal_entries::Column::TenantId.eq(tenant_id))
        .filter(journal_entries::Column::Status.eq(sea_orm_active_enums::JournalStatus::Posted));
    if let Some(to) = range.to {
        query = query.filter(journal_entries::Column::EntryDate.lte(to));
    }
    // Rows before the window only matter when they are carried forward.
    if let (Some(from), OpeningBalancePolicy::Stored) = (range.from, policy) {
        query = query.filter(journal_entries::Column::EntryDate.gte(from));
    }

    let rows = query
        .into_model::<AccountLineRow>()
        .all(conn)
        .await?
        .into_iter()
        .map(|line| StatementRow {
            date: line.entry_date,
            sequence: line.entry_sequence,
            id: line.id,
            source: RowSource::JournalLine,
            reference: Some(line.entry_number),
            description: line
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(line.entry_description),
            debit: line.debit,
            credit: line.credit,
        })
        .collect();

    Ok((side, account.opening_balance, rows))
}

async fn party_statement_rows<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    party_type: PartyType,
    party_id: Uuid,
) -> RepoResult<SubjectRows> {
    if party_type == PartyType::Other {
        return Err(StatementError::InvalidSubject.into());
    }
    let record = party::find_party(conn, tenant_id, party_type, party_id)
        .await
        .map_err(|e| match e {
            RepoError::Chart(ChartError::PartyNotFound { party_id, .. }) => {
                RepoError::from(StatementError::PartyNotFound(party_id))
            }
            other => other,
        })?;

    let vouchers: Vec<VoucherFact> = voucher::party_vouchers(conn, tenant_id, party_type, party_id)
        .await?
        .into_iter()
        .map(voucher_fact)
        .collect();

    let rows = match party_type {
        PartyType::Customer => {
            let plan_rows = installments::Entity::find()
                .filter(installments::Column::TenantId.eq(tenant_id))
                .filter(installments::Column::CustomerId.eq(party_id))
                .all(conn)
                .await?;
            let mut plan_interest: HashMap<Uuid, Decimal> = HashMap::new();
            for inst in &plan_rows {
                *plan_interest.entry(inst.invoice_id).or_default() += inst.amount - inst.principal;
            }
            let invoices: Vec<InvoiceFact> = invoices::Entity::find()
                .filter(invoices::Column::TenantId.eq(tenant_id))
                .filter(invoices::Column::CustomerId.eq(party_id))
                .all(conn)
                .await?
                .into_iter()
                .map(|i| InvoiceFact {
                    id: i.id,
                    date: i.issue_date,
                    sequence: i.created_at.timestamp_micros(),
                    plan_interest: plan_interest.get(&i.id).copied().unwrap_or_default(),
                    number: i.invoice_number,
                    total_amount: i.total_amount,
                    amount_paid: i.amount_paid,
                })
                .collect();
            let collected: Vec<InstallmentFact> = plan_rows
                .into_iter()
                .filter(|i| !i.amount_paid.is_zero())
                .filter_map(|i| {
                    Some(InstallmentFact {
                        id: i.id,
                        invoice_id: i.invoice_id,
                        paid_date: i.paid_date?,
                        sequence: i.created_at.timestamp_micros(),
                        amount_paid: i.amount_paid,
                        principal_paid: i.amount_paid.min(i.principal),
                    })
                })
                .collect();
            customer_rows(&invoices, &collected, &vouchers)
        }
        PartyType::Supplier => {
            let purchases: Vec<InvoiceFact> = purchase_invoices::Entity::find()
                .filter(purchase_invoices::Column::TenantId.eq(tenant_id))
                .filter(purchase_invoices::Column::SupplierId.eq(party_id))
                .all(conn)
                .await?
                .into_iter()
                .map(|p| InvoiceFact {
                    id: p.id,
                    date: p.issue_date,
                    sequence: p.created_at.timestamp_micros(),
                    number: p.invoice_number,
                    total_amount: p.total_amount,
                    amount_paid: p.amount_paid,
                    plan_interest: Decimal::ZERO,
                })
                .collect();
            supplier_rows(&purchases, &vouchers)
        }
        PartyType::Other => Vec::new(),
    };

    Ok((party_type.normal_side(), record.opening_balance, rows))
}

fn voucher_fact(v: vouchers::Model) -> VoucherFact {
    VoucherFact {
        id: v.id,
        date: v.voucher_date,
        sequence: v.created_at.timestamp_micros(),
        number: v.voucher_number,
        voucher_type: v.voucher_type.into(),
        amount: v.amount,
        description: v.description,
    }
}
