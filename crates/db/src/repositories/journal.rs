//! Journal repository: the storage half of the posting engine.
//!
//! Every entry is validated by `LedgerService` before the first write and
//! inserted with all of its lines inside one database transaction.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use tallybook_core::ledger::{
    AccountInfo, CreateJournalEntryInput, JournalStatus, LedgerError, LedgerService,
    ResolvedLine, ReversalService, document_number,
};
use tallybook_shared::config::LedgerConfig;

use crate::entities::{accounts, journal_entries, journal_lines, sea_orm_active_enums};
use crate::error::{RepoError, RepoResult, is_unique_violation};
use crate::repositories::fiscal;
use crate::repositories::sequence::{self, SequenceKind};

/// Journal entry header with its lines in line order.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Lines.
    pub lines: Vec<journal_lines::Model>,
}

impl JournalEntryWithLines {
    /// Sum of debits.
    #[must_use]
    pub fn total_debit(&self) -> rust_decimal::Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of credits.
    #[must_use]
    pub fn total_credit(&self) -> rust_decimal::Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct JournalFilter {
    /// Filter by status.
    pub status: Option<JournalStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Validates and inserts one entry with its lines on `conn`.
///
/// Callers own the transaction; nothing here commits.
pub(crate) async fn insert_entry<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    input: &CreateJournalEntryInput,
    reversal_of: Option<Uuid>,
    ledger: &LedgerConfig,
) -> RepoResult<JournalEntryWithLines> {
    let mut account_ids: Vec<Uuid> = input.lines.iter().map(|l| l.account_id).collect();
    account_ids.sort_unstable();
    account_ids.dedup();

    let known: HashMap<Uuid, AccountInfo> = if account_ids.is_empty() {
        HashMap::new()
    } else {
        accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|a| {
                (
                    a.id,
                    AccountInfo {
                        id: a.id,
                        account_type: a.account_type.into(),
                    },
                )
            })
            .collect()
    };

    let (resolved, totals) = LedgerService::validate_and_resolve(
        input,
        ledger.balance_tolerance,
        ledger.currency_decimals,
        |id| known.get(&id).copied().ok_or(LedgerError::AccountNotFound(id)),
    )?;

    let fiscal_year =
        fiscal::resolve_for_posting(conn, tenant_id, input.fiscal_year_id, input.entry_date)
            .await?;

    let sequence = sequence::next_value(conn, tenant_id, SequenceKind::JournalEntry).await?;
    let entry_id = Uuid::now_v7();
    let now = chrono::Utc::now().into();

    let entry = journal_entries::ActiveModel {
        id: Set(entry_id),
        tenant_id: Set(tenant_id),
        fiscal_year_id: Set(fiscal_year.id),
        entry_number: Set(document_number("JE", sequence)),
        sequence: Set(sequence),
        entry_date: Set(input.entry_date),
        description: Set(input.description.trim().to_string()),
        reference: Set(input.reference.clone()),
        status: Set(input.status.into()),
        reversal_of: Set(reversal_of),
        created_at: Set(now),
    }
    .insert(conn)
    .await?;

    let mut lines = Vec::with_capacity(resolved.len());
    for (line_no, line) in (1_i32..).zip(resolved) {
        let inserted = journal_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            journal_entry_id: Set(entry_id),
            account_id: Set(line.account_id),
            line_no: Set(line_no),
            debit: Set(line.debit),
            credit: Set(line.credit),
            description: Set(line.description),
        }
        .insert(conn)
        .await?;
        lines.push(inserted);
    }

    tracing::debug!(
        tenant_id = %tenant_id,
        entry_id = %entry_id,
        entry_number = %entry.entry_number,
        total_debit = %totals.total_debit,
        total_credit = %totals.total_credit,
        "Journal entry inserted"
    );

    Ok(JournalEntryWithLines { entry, lines })
}

async fn load_entry<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    entry_id: Uuid,
) -> RepoResult<JournalEntryWithLines> {
    let entry = journal_entries::Entity::find_by_id(entry_id)
        .filter(journal_entries::Column::TenantId.eq(tenant_id))
        .one(conn)
        .await?
        .ok_or(LedgerError::EntryNotFound(entry_id))?;

    let lines = journal_lines::Entity::find()
        .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntries.def())
        .filter(journal_lines::Column::JournalEntryId.eq(entry_id))
        .filter(journal_entries::Column::TenantId.eq(tenant_id))
        .order_by_asc(journal_lines::Column::LineNo)
        .all(conn)
        .await?;

    Ok(JournalEntryWithLines { entry, lines })
}

/// Journal repository for posting and reading entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    ledger: LedgerConfig,
}

impl JournalRepository {
    /// Creates a new journal repository with the default posting policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_config(db, LedgerConfig::default())
    }

    /// Creates a new journal repository with an explicit posting policy.
    #[must_use]
    pub const fn with_config(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self { db, ledger }
    }

    /// Creates a journal entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry fails validation (fewer than two lines, unbalanced, ...)
    /// - An account or the fiscal year is unknown in the tenant
    /// - The fiscal year is closed
    ///
    /// Nothing is persisted on error.
    pub async fn create_journal_entry(
        &self,
        tenant_id: Uuid,
        input: CreateJournalEntryInput,
    ) -> RepoResult<JournalEntryWithLines> {
        let txn = self.db.begin().await?;
        let created = insert_entry(&txn, tenant_id, &input, None, &self.ledger).await?;
        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            entry_id = %created.entry.id,
            entry_number = %created.entry.entry_number,
            lines = created.lines.len(),
            "Journal entry created"
        );
        Ok(created)
    }

    /// Promotes a draft entry to posted.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` for unknown or cross-tenant ids, `AlreadyPosted` for
    /// posted entries (including a concurrent post that won), and fiscal year
    /// errors if the year has been closed since drafting.
    pub async fn post_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
    ) -> RepoResult<JournalEntryWithLines> {
        let txn = self.db.begin().await?;

        let current = load_entry(&txn, tenant_id, entry_id).await?;
        LedgerService::validate_can_post(entry_id, current.entry.status.into())?;
        fiscal::resolve_for_posting(
            &txn,
            tenant_id,
            Some(current.entry.fiscal_year_id),
            current.entry.entry_date,
        )
        .await?;

        let result = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::Status,
                Expr::value(sea_orm_active_enums::JournalStatus::Posted),
            )
            .filter(journal_entries::Column::Id.eq(entry_id))
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .filter(journal_entries::Column::Status.eq(sea_orm_active_enums::JournalStatus::Draft))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::AlreadyPosted(entry_id).into());
        }

        let posted = load_entry(&txn, tenant_id, entry_id).await?;
        txn.commit().await?;

        tracing::info!(tenant_id = %tenant_id, entry_id = %entry_id, "Journal entry posted");
        Ok(posted)
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` for unknown or cross-tenant ids.
    pub async fn get_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
    ) -> RepoResult<JournalEntryWithLines> {
        load_entry(&self.db, tenant_id, entry_id).await
    }

    /// Lists entry headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        tenant_id: Uuid,
        filter: JournalFilter,
    ) -> RepoResult<Vec<journal_entries::Model>> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id));

        if let Some(status) = filter.status {
            query = query.filter(
                journal_entries::Column::Status
                    .eq(sea_orm_active_enums::JournalStatus::from(status)),
            );
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
        }

        Ok(query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::Sequence)
            .all(&self.db)
            .await?)
    }

    /// Posts a reversing entry for a posted entry.
    ///
    /// The new entry swaps every debit and credit of the original, is dated
    /// `date`, references the original number and records `reversal_of`.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` for unknown or cross-tenant ids, `CannotReverseDraft`
    /// for drafts, `AlreadyReversed` if a reversal exists.
    pub async fn reverse_entry(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
        date: NaiveDate,
        reason: &str,
    ) -> RepoResult<JournalEntryWithLines> {
        let txn = self.db.begin().await?;

        let original = load_entry(&txn, tenant_id, entry_id).await?;
        let already_reversed = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .filter(journal_entries::Column::ReversalOf.eq(entry_id))
            .one(&txn)
            .await?
            .is_some();
        LedgerService::validate_can_reverse(
            entry_id,
            original.entry.status.into(),
            already_reversed,
        )?;

        let resolved: Vec<ResolvedLine> = original
            .lines
            .iter()
            .map(|l| ResolvedLine {
                account_id: l.account_id,
                debit: l.debit,
                credit: l.credit,
                description: l.description.clone(),
            })
            .collect();
        let input = CreateJournalEntryInput::posted(
            date,
            ReversalService::description(&original.entry.entry_number, reason),
            ReversalService::reversing_lines(&resolved),
        )
        .with_reference(original.entry.entry_number.clone());

        let reversal = insert_entry(&txn, tenant_id, &input, Some(entry_id), &self.ledger)
            .await
            .map_err(|e| match e {
                RepoError::Database(ref db) if is_unique_violation(db) => {
                    RepoError::from(LedgerError::AlreadyReversed(entry_id))
                }
                other => other,
            })?;

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            entry_id = %entry_id,
            reversal_id = %reversal.entry.id,
            "Journal entry reversed"
        );
        Ok(reversal)
    }
}
