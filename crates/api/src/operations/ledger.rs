//! Journal entries and vouchers.

use chrono::NaiveDate;
use uuid::Uuid;

use tallybook_core::ledger::CreateJournalEntryInput;
use tallybook_db::entities::journal_entries;
use tallybook_db::repositories::{
    JournalEntryWithLines, JournalFilter, PostVoucherInput, PostedVoucher,
};
use tallybook_shared::{OpResult, TenantContext};

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// Validates and persists a journal entry with its lines, atomically.
    pub async fn create_journal_entry(
        &self,
        ctx: &TenantContext,
        input: CreateJournalEntryInput,
    ) -> OpResult<JournalEntryWithLines> {
        let result = self
            .journal
            .create_journal_entry(ctx.tenant_id.into_inner(), input)
            .await;
        respond("create_journal_entry", ctx, result)
    }

    /// Promotes a draft entry to posted.
    pub async fn post_entry(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
    ) -> OpResult<JournalEntryWithLines> {
        let result = self
            .journal
            .post_entry(ctx.tenant_id.into_inner(), entry_id)
            .await;
        respond("post_entry", ctx, result)
    }

    /// Gets an entry with its lines.
    pub async fn get_entry(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
    ) -> OpResult<JournalEntryWithLines> {
        let result = self
            .journal
            .get_entry(ctx.tenant_id.into_inner(), entry_id)
            .await;
        respond("get_entry", ctx, result)
    }

    /// Lists entry headers.
    pub async fn list_entries(
        &self,
        ctx: &TenantContext,
        filter: JournalFilter,
    ) -> OpResult<Vec<journal_entries::Model>> {
        let result = self
            .journal
            .list_entries(ctx.tenant_id.into_inner(), filter)
            .await;
        respond("list_entries", ctx, result)
    }

    /// Posts a reversing entry for a posted entry.
    pub async fn reverse_entry(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
        date: NaiveDate,
        reason: &str,
    ) -> OpResult<JournalEntryWithLines> {
        let result = self
            .journal
            .reverse_entry(ctx.tenant_id.into_inner(), entry_id, date, reason)
            .await;
        respond("reverse_entry", ctx, result)
    }

    /// Posts a receipt or payment voucher with its journal entry.
    ///
    /// The acting user is recorded as the creator unless one is given.
    pub async fn post_voucher(
        &self,
        ctx: &TenantContext,
        mut input: PostVoucherInput,
    ) -> OpResult<PostedVoucher> {
        input.created_by = input.created_by.or(Some(ctx.user_id.into_inner()));
        let result = self
            .vouchers
            .post_voucher(ctx.tenant_id.into_inner(), input)
            .await;
        respond("post_voucher", ctx, result)
    }
}
