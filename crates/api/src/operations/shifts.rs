//! Cash-drawer shifts. The acting user is the cashier.

use rust_decimal::Decimal;
use uuid::Uuid;

use tallybook_core::shift::ShiftSummary;
use tallybook_db::entities::shifts;
use tallybook_db::repositories::ClosedShift;
use tallybook_shared::{OpResult, TenantContext};

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// Opens a shift for the acting user.
    pub async fn open_shift(
        &self,
        ctx: &TenantContext,
        start_balance: Decimal,
    ) -> OpResult<shifts::Model> {
        let result = self
            .shifts
            .open_shift(ctx.tenant_id.into_inner(), ctx.user_id.into_inner(), start_balance)
            .await;
        respond("open_shift", ctx, result)
    }

    /// The acting user's open shift, if any.
    pub async fn get_current_shift(&self, ctx: &TenantContext) -> OpResult<Option<shifts::Model>> {
        let result = self
            .shifts
            .get_current_shift(ctx.tenant_id.into_inner(), ctx.user_id.into_inner())
            .await;
        respond("get_current_shift", ctx, result)
    }

    /// Aggregates the sales and vouchers of a shift.
    pub async fn get_shift_summary(
        &self,
        ctx: &TenantContext,
        shift_id: Uuid,
    ) -> OpResult<ShiftSummary> {
        let result = self
            .shifts
            .get_shift_summary(ctx.tenant_id.into_inner(), shift_id)
            .await;
        respond("get_shift_summary", ctx, result)
    }

    /// Closes a shift against the counted cash.
    pub async fn close_shift(
        &self,
        ctx: &TenantContext,
        shift_id: Uuid,
        actual_cash: Decimal,
        notes: Option<String>,
    ) -> OpResult<ClosedShift> {
        let result = self
            .shifts
            .close_shift(ctx.tenant_id.into_inner(), shift_id, actual_cash, notes)
            .await;
        respond("close_shift", ctx, result)
    }
}
