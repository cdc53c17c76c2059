//! Installment plans.

use chrono::NaiveDate;
use uuid::Uuid;

use tallybook_db::entities::installments;
use tallybook_db::repositories::{
    CollectedInstallment, CreatePlanInput, InstallmentFilter, InstallmentView,
};
use tallybook_shared::{OpResult, TenantContext};

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// Splits an invoice into pending installments.
    pub async fn create_plan(
        &self,
        ctx: &TenantContext,
        input: CreatePlanInput,
    ) -> OpResult<Vec<installments::Model>> {
        let result = self
            .installments
            .create_plan(ctx.tenant_id.into_inner(), input)
            .await;
        respond("create_plan", ctx, result)
    }

    /// Collects an installment in full on `payment_date`.
    pub async fn pay_installment(
        &self,
        ctx: &TenantContext,
        installment_id: Uuid,
        payment_date: NaiveDate,
    ) -> OpResult<CollectedInstallment> {
        let result = self
            .installments
            .pay_installment(ctx.tenant_id.into_inner(), installment_id, payment_date)
            .await;
        respond("pay_installment", ctx, result)
    }

    /// Lists installments with their overdue flag as of `today`.
    pub async fn list_installments(
        &self,
        ctx: &TenantContext,
        filter: InstallmentFilter,
        today: NaiveDate,
    ) -> OpResult<Vec<InstallmentView>> {
        let result = self
            .installments
            .list_installments(ctx.tenant_id.into_inner(), filter, today)
            .await;
        respond("list_installments", ctx, result)
    }
}
