//! Invoice repository.
//!
//! Sales and purchasing record their invoices here. The ledger reads them
//! back for party statements and shift summaries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use tallybook_core::chart::PartyType;
use tallybook_core::invoice::{InvoiceError, PaymentMethod, PaymentStatus, validate_amounts};
use tallybook_core::shift::{ShiftError, ShiftStatus};

use crate::entities::{invoices, purchase_invoices, shifts};
use crate::error::RepoResult;
use crate::repositories::party;

/// Input for recording a sales invoice.
#[derive(Debug, Clone)]
pub struct RecordSaleInput {
    /// Customer; `None` for a walk-in sale.
    pub customer_id: Option<Uuid>,
    /// Invoice number from the sales module.
    pub invoice_number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Invoice total.
    pub total_amount: Decimal,
    /// Amount collected at sale.
    pub amount_paid: Decimal,
    /// Tender.
    pub payment_method: PaymentMethod,
    /// Open shift the sale was rung up in.
    pub shift_id: Option<Uuid>,
}

/// Input for recording a purchase invoice.
#[derive(Debug, Clone)]
pub struct RecordPurchaseInput {
    /// Supplier.
    pub supplier_id: Uuid,
    /// Supplier's invoice number.
    pub invoice_number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Invoice total.
    pub total_amount: Decimal,
    /// Amount paid at purchase.
    pub amount_paid: Decimal,
}

fn invoice_number(raw: &str) -> Result<String, InvoiceError> {
    let number = raw.trim();
    if number.is_empty() {
        return Err(InvoiceError::EmptyNumber);
    }
    Ok(number.to_string())
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a sales invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The number is blank or the amounts are inconsistent
    /// - The customer is unknown in the tenant
    /// - The shift is unknown in the tenant or already closed
    pub async fn record_sale(
        &self,
        tenant_id: Uuid,
        input: RecordSaleInput,
    ) -> RepoResult<invoices::Model> {
        let number = invoice_number(&input.invoice_number)?;
        validate_amounts(input.total_amount, input.amount_paid)?;

        let txn = self.db.begin().await?;

        if let Some(customer_id) = input.customer_id {
            party::find_party(&txn, tenant_id, PartyType::Customer, customer_id).await?;
        }
        if let Some(shift_id) = input.shift_id {
            let shift = shifts::Entity::find_by_id(shift_id)
                .filter(shifts::Column::TenantId.eq(tenant_id))
                .lock_shared()
                .one(&txn)
                .await?
                .ok_or(ShiftError::NotFound(shift_id))?;
            if ShiftStatus::from(shift.status) != ShiftStatus::Open {
                return Err(ShiftError::AlreadyClosed(shift_id).into());
            }
        }

        let invoice = invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            customer_id: Set(input.customer_id),
            invoice_number: Set(number),
            issue_date: Set(input.issue_date),
            total_amount: Set(input.total_amount),
            amount_paid: Set(input.amount_paid),
            payment_status: Set(
                PaymentStatus::from_amounts(input.total_amount, input.amount_paid).into(),
            ),
            payment_method: Set(input.payment_method.into()),
            shift_id: Set(input.shift_id),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "Sales invoice recorded"
        );
        Ok(invoice)
    }

    /// Records a purchase invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is blank, the amounts are inconsistent
    /// or the supplier is unknown in the tenant.
    pub async fn record_purchase(
        &self,
        tenant_id: Uuid,
        input: RecordPurchaseInput,
    ) -> RepoResult<purchase_invoices::Model> {
        let number = invoice_number(&input.invoice_number)?;
        validate_amounts(input.total_amount, input.amount_paid)?;
        party::find_party(&self.db, tenant_id, PartyType::Supplier, input.supplier_id).await?;

        let purchase = purchase_invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            supplier_id: Set(input.supplier_id),
            invoice_number: Set(number),
            issue_date: Set(input.issue_date),
            total_amount: Set(input.total_amount),
            amount_paid: Set(input.amount_paid),
            payment_status: Set(
                PaymentStatus::from_amounts(input.total_amount, input.amount_paid).into(),
            ),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            tenant_id = %tenant_id,
            purchase_id = %purchase.id,
            invoice_number = %purchase.invoice_number,
            "Purchase invoice recorded"
        );
        Ok(purchase)
    }

    /// Finds a sales invoice inside the tenant.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or cross-tenant ids.
    pub async fn find_invoice(
        &self,
        tenant_id: Uuid,
        invoice_id: Uuid,
    ) -> RepoResult<invoices::Model> {
        Ok(invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(invoice_id))?)
    }
}
