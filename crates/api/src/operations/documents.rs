//! Invoice capture from the sales and purchasing modules.

use uuid::Uuid;

use tallybook_db::entities::{invoices, purchase_invoices};
use tallybook_db::repositories::{RecordPurchaseInput, RecordSaleInput};
use tallybook_shared::{OpResult, TenantContext};

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// Records a sales invoice.
    pub async fn record_sale(
        &self,
        ctx: &TenantContext,
        input: RecordSaleInput,
    ) -> OpResult<invoices::Model> {
        let result = self
            .invoices
            .record_sale(ctx.tenant_id.into_inner(), input)
            .await;
        respond("record_sale", ctx, result)
    }

    /// Records a purchase invoice.
    pub async fn record_purchase(
        &self,
        ctx: &TenantContext,
        input: RecordPurchaseInput,
    ) -> OpResult<purchase_invoices::Model> {
        let result = self
            .invoices
            .record_purchase(ctx.tenant_id.into_inner(), input)
            .await;
        respond("record_purchase", ctx, result)
    }

    /// Gets a sales invoice.
    pub async fn get_invoice(
        &self,
        ctx: &TenantContext,
        invoice_id: Uuid,
    ) -> OpResult<invoices::Model> {
        let result = self
            .invoices
            .find_invoice(ctx.tenant_id.into_inner(), invoice_id)
            .await;
        respond("get_invoice", ctx, result)
    }
}
