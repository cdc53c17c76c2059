//! Cash voucher repository.
//!
//! A voucher is a cash receipt or payment against a party or an explicit
//! account. The voucher row, its journal entry and the entry lines are
//! written in one transaction, so a voucher never exists without its
//! ledger posting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use tallybook_core::chart::{AccountRole, PartyType};
use tallybook_core::ledger::{
    Counterparty, CreateJournalEntryInput, LedgerError, VoucherType, document_number,
    validate_voucher_amount,
};
use tallybook_core::shift::ShiftStatus;
use tallybook_shared::config::LedgerConfig;

use crate::entities::{sea_orm_active_enums, shifts, vouchers};
use crate::error::RepoResult;
use crate::repositories::account;
use crate::repositories::journal::{self, JournalEntryWithLines};
use crate::repositories::sequence::{self, SequenceKind};

/// Input for posting a voucher.
#[derive(Debug, Clone)]
pub struct PostVoucherInput {
    /// Receipt or payment.
    pub voucher_type: VoucherType,
    /// Amount, strictly positive.
    pub amount: Decimal,
    /// Voucher date.
    pub date: NaiveDate,
    /// Counterparty kind.
    pub party_type: PartyType,
    /// Customer or supplier id (for `Customer`/`Supplier`).
    pub party_id: Option<Uuid>,
    /// Counter-account id (for `Other`).
    pub account_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Open shift the cash moved through.
    pub shift_id: Option<Uuid>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

impl PostVoucherInput {
    /// A voucher against a customer or supplier.
    #[must_use]
    pub const fn for_party(
        voucher_type: VoucherType,
        amount: Decimal,
        date: NaiveDate,
        party_type: PartyType,
        party_id: Uuid,
    ) -> Self {
        Self {
            voucher_type,
            amount,
            date,
            party_type,
            party_id: Some(party_id),
            account_id: None,
            description: None,
            shift_id: None,
            created_by: None,
        }
    }

    /// A voucher against an explicit counter-account.
    #[must_use]
    pub const fn for_account(
        voucher_type: VoucherType,
        amount: Decimal,
        date: NaiveDate,
        account_id: Uuid,
    ) -> Self {
        Self {
            voucher_type,
            amount,
            date,
            party_type: PartyType::Other,
            party_id: None,
            account_id: Some(account_id),
            description: None,
            shift_id: None,
            created_by: None,
        }
    }

    /// Links the voucher to a shift.
    #[must_use]
    pub fn in_shift(mut self, shift_id: Uuid) -> Self {
        self.shift_id = Some(shift_id);
        self
    }
}

/// A voucher with the journal entry backing it.
#[derive(Debug, Clone, Serialize)]
pub struct PostedVoucher {
    /// Voucher row.
    pub voucher: vouchers::Model,
    /// Journal entry and lines.
    pub entry: JournalEntryWithLines,
}

const fn sequence_kind(voucher_type: VoucherType) -> SequenceKind {
    match voucher_type {
        VoucherType::Receipt => SequenceKind::ReceiptVoucher,
        VoucherType::Payment => SequenceKind::PaymentVoucher,
    }
}

const fn default_label(voucher_type: VoucherType) -> &'static str {
    match voucher_type {
        VoucherType::Receipt => "Receipt voucher",
        VoucherType::Payment => "Payment voucher",
    }
}

/// Checks that `shift_id` is an open shift of the tenant.
///
/// The shared lock makes a concurrent close wait for this transaction, so
/// the voucher is either in the shift summary or rejected.
async fn ensure_open_shift<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    shift_id: Uuid,
) -> RepoResult<()> {
    let shift = shifts::Entity::find_by_id(shift_id)
        .filter(shifts::Column::TenantId.eq(tenant_id))
        .lock_shared()
        .one(conn)
        .await?
        .ok_or(LedgerError::ShiftNotFound(shift_id))?;
    if ShiftStatus::from(shift.status) != ShiftStatus::Open {
        return Err(LedgerError::ShiftNotOpen(shift_id).into());
    }
    Ok(())
}

/// Voucher repository.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    db: DatabaseConnection,
    ledger: LedgerConfig,
}

impl VoucherRepository {
    /// Creates a new voucher repository with the default posting policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_config(db, LedgerConfig::default())
    }

    /// Creates a new voucher repository with an explicit posting policy.
    #[must_use]
    pub const fn with_config(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self { db, ledger }
    }

    /// Posts a receipt or payment voucher.
    ///
    /// Cash is the tenant's cash role account. The counter-account is the
    /// party's sub-ledger account for customers and suppliers, or the given
    /// account for `Other`. Receipts debit cash; payments credit it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive or the counterparty id is missing
    /// - The party, account or shift is unknown in the tenant
    /// - The shift is closed
    /// - The journal entry fails validation
    ///
    /// Nothing is persisted on error.
    pub async fn post_voucher(
        &self,
        tenant_id: Uuid,
        input: PostVoucherInput,
    ) -> RepoResult<PostedVoucher> {
        validate_voucher_amount(input.amount)?;
        let counterparty =
            Counterparty::from_parts(input.party_type, input.party_id, input.account_id)?;

        let txn = self.db.begin().await?;

        if let Some(shift_id) = input.shift_id {
            ensure_open_shift(&txn, tenant_id, shift_id).await?;
        }

        let cash = account::resolve_role_account(&txn, tenant_id, AccountRole::Cash).await?;
        let counter = match counterparty {
            Counterparty::Party {
                party_type,
                party_id,
            } => account::resolve_party_account(&txn, tenant_id, party_type, party_id).await?,
            Counterparty::Account(account_id) => {
                account::find_account(&txn, tenant_id, account_id)
                    .await?
                    .ok_or(LedgerError::AccountNotFound(account_id))?
            }
        };

        let number_value =
            sequence::next_value(&txn, tenant_id, sequence_kind(input.voucher_type)).await?;
        let number = document_number(input.voucher_type.number_prefix(), number_value);
        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map_or_else(
                || format!("{} {number}", default_label(input.voucher_type)),
                str::to_string,
            );

        let entry_input = CreateJournalEntryInput::posted(
            input.date,
            description.clone(),
            input
                .voucher_type
                .journal_lines(cash.id, counter.id, input.amount),
        )
        .with_reference(number.clone());
        let entry = journal::insert_entry(&txn, tenant_id, &entry_input, None, &self.ledger).await?;

        let voucher = vouchers::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            voucher_number: Set(number),
            voucher_type: Set(input.voucher_type.into()),
            amount: Set(input.amount),
            voucher_date: Set(input.date),
            party_type: Set(counterparty.party_type().into()),
            party_id: Set(input.party_id.filter(|_| counterparty.party_type() != PartyType::Other)),
            account_id: Set(Some(counter.id)),
            description: Set(Some(description)),
            shift_id: Set(input.shift_id),
            journal_entry_id: Set(entry.entry.id),
            created_by: Set(input.created_by),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            voucher_id = %voucher.id,
            voucher_number = %voucher.voucher_number,
            entry_id = %entry.entry.id,
            amount = %voucher.amount,
            "Voucher posted"
        );
        Ok(PostedVoucher { voucher, entry })
    }

    /// Lists the vouchers recorded against a party, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_party_vouchers(
        &self,
        tenant_id: Uuid,
        party_type: PartyType,
        party_id: Uuid,
    ) -> RepoResult<Vec<vouchers::Model>> {
        Ok(party_vouchers(&self.db, tenant_id, party_type, party_id).await?)
    }
}

/// Vouchers recorded against a party, in posting order.
pub(crate) async fn party_vouchers<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    party_type: PartyType,
    party_id: Uuid,
) -> Result<Vec<vouchers::Model>, sea_orm::DbErr> {
    vouchers::Entity::find()
        .filter(vouchers::Column::TenantId.eq(tenant_id))
        .filter(vouchers::Column::PartyType.eq(sea_orm_active_enums::PartyType::from(party_type)))
        .filter(vouchers::Column::PartyId.eq(party_id))
        .order_by_asc(vouchers::Column::VoucherDate)
        .order_by_asc(vouchers::Column::CreatedAt)
        .order_by_asc(vouchers::Column::Id)
        .all(conn)
        .await
}
