//! Installment repository: plan creation and collection.
//!
//! A plan with interest posts the interest to receivables when it is
//! created. Collecting an installment marks it paid, bumps the invoice's
//! `amount_paid` by the principal share and posts cash against
//! receivables, all in one transaction. The paid transition is a conditional update, so of two
//! concurrent collectors exactly one wins and the other gets a conflict.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use tallybook_core::chart::AccountRole;
use tallybook_core::installment::{
    InstallmentError, InstallmentScheduler, InstallmentStatus, PlanInput, is_overdue,
};
use tallybook_core::invoice::PaymentStatus;
use tallybook_core::ledger::{CreateJournalEntryInput, JournalLineInput};
use tallybook_shared::config::LedgerConfig;

use crate::entities::{installments, invoices, sea_orm_active_enums};
use crate::error::{RepoError, RepoResult, is_unique_violation};
use crate::repositories::account;
use crate::repositories::journal::{self, JournalEntryWithLines};

/// Input for creating an installment plan.
#[derive(Debug, Clone, Copy)]
pub struct CreatePlanInput {
    /// Invoice being financed.
    pub invoice_id: Uuid,
    /// Paid up front, outside the plan.
    pub down_payment: Decimal,
    /// Number of installments.
    pub count: u32,
    /// Flat interest on the financed amount, in percent.
    pub interest_percent: Decimal,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
}

/// Filter options for listing installments.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallmentFilter {
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Filter by invoice.
    pub invoice_id: Option<Uuid>,
    /// Only rows past due and not paid.
    pub overdue_only: bool,
}

/// An installment with its derived overdue flag.
#[derive(Debug, Clone, Serialize)]
pub struct InstallmentView {
    /// Installment row.
    pub installment: installments::Model,
    /// `due_date < today` and not paid.
    pub overdue: bool,
}

/// Result of collecting an installment.
#[derive(Debug, Clone, Serialize)]
pub struct CollectedInstallment {
    /// The installment, now paid.
    pub installment: installments::Model,
    /// The invoice with its new amount paid.
    pub invoice: invoices::Model,
    /// Cash / receivables posting.
    pub entry: JournalEntryWithLines,
}

/// Installment repository.
#[derive(Debug, Clone)]
pub struct InstallmentRepository {
    db: DatabaseConnection,
    ledger: LedgerConfig,
}

impl InstallmentRepository {
    /// Creates a new installment repository with the default posting policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_config(db, LedgerConfig::default())
    }

    /// Creates a new installment repository with an explicit posting policy.
    #[must_use]
    pub const fn with_config(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self { db, ledger }
    }

    /// Generates and stores the installment rows of an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice is unknown in the tenant or has no customer
    /// - The plan inputs are invalid (count, negative values, down payment)
    /// - The invoice already has a plan
    /// - The invoice date has no open fiscal year to carry the interest posting
    pub async fn create_plan(
        &self,
        tenant_id: Uuid,
        input: CreatePlanInput,
    ) -> RepoResult<Vec<installments::Model>> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(input.invoice_id)
            .filter(invoices::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(InstallmentError::InvoiceNotFound(input.invoice_id))?;
        let customer_id = invoice
            .customer_id
            .ok_or(InstallmentError::NoCustomer(invoice.id))?;

        let existing = installments::Entity::find()
            .filter(installments::Column::TenantId.eq(tenant_id))
            .filter(installments::Column::InvoiceId.eq(invoice.id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(InstallmentError::PlanExists(invoice.id).into());
        }

        let plan = PlanInput {
            total_amount: invoice.total_amount,
            down_payment: input.down_payment,
            count: input.count,
            interest_percent: input.interest_percent,
            start_date: input.start_date,
        };
        let schedule = InstallmentScheduler::generate(&plan)?;
        let interest = InstallmentScheduler::interest_amount(&plan);

        let now = chrono::Utc::now().into();
        let mut rows = Vec::with_capacity(schedule.len());
        for scheduled in schedule {
            let row = installments::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(tenant_id),
                customer_id: Set(customer_id),
                invoice_id: Set(invoice.id),
                sequence: Set(i32::try_from(scheduled.sequence).unwrap_or(i32::MAX)),
                due_date: Set(scheduled.due_date),
                amount: Set(scheduled.amount),
                principal: Set(scheduled.principal),
                amount_paid: Set(Decimal::ZERO),
                status: Set(sea_orm_active_enums::InstallmentStatus::Pending),
                paid_date: Set(None),
                journal_entry_id: Set(None),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepoError::from(InstallmentError::PlanExists(invoice.id))
                } else {
                    RepoError::from(e)
                }
            })?;
            rows.push(row);
        }

        let interest_entry = if interest > Decimal::ZERO {
            let receivable =
                account::resolve_role_account(&txn, tenant_id, AccountRole::AccountsReceivable)
                    .await?;
            let revenue =
                account::resolve_role_account(&txn, tenant_id, AccountRole::Revenue).await?;
            let entry_input = CreateJournalEntryInput::posted(
                invoice.issue_date,
                format!("Installment plan interest on invoice {}", invoice.invoice_number),
                vec![
                    JournalLineInput::debit(receivable.id, interest),
                    JournalLineInput::credit(revenue.id, interest),
                ],
            )
            .with_reference(invoice.invoice_number.clone());
            let entry =
                journal::insert_entry(&txn, tenant_id, &entry_input, None, &self.ledger).await?;
            Some(entry.entry.id)
        } else {
            None
        };

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            invoice_id = %invoice.id,
            count = rows.len(),
            interest = %interest,
            interest_entry_id = ?interest_entry,
            "Installment plan created"
        );
        Ok(rows)
    }

    /// Collects an installment in full.
    ///
    /// Cash is debited with the whole installment; the invoice only counts
    /// the principal share as paid, the interest having been receivable
    /// since the plan was created.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or cross-tenant ids, `AlreadyPaid` if the
    /// installment is paid (including by a concurrent collector). Nothing
    /// is persisted on error.
    pub async fn pay_installment(
        &self,
        tenant_id: Uuid,
        installment_id: Uuid,
        payment_date: NaiveDate,
    ) -> RepoResult<CollectedInstallment> {
        let txn = self.db.begin().await?;

        let current = installments::Entity::find_by_id(installment_id)
            .filter(installments::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(InstallmentError::NotFound(installment_id))?;
        let due = InstallmentScheduler::amount_due(
            installment_id,
            current.status.into(),
            current.amount,
            current.amount_paid,
        )?;
        let principal = InstallmentScheduler::principal_due(current.principal, current.amount_paid);

        let claimed = installments::Entity::update_many()
            .col_expr(
                installments::Column::Status,
                Expr::value(sea_orm_active_enums::InstallmentStatus::Paid),
            )
            .col_expr(
                installments::Column::AmountPaid,
                SimpleExpr::from(Expr::col(installments::Column::Amount)),
            )
            .col_expr(installments::Column::PaidDate, Expr::value(payment_date))
            .filter(installments::Column::Id.eq(installment_id))
            .filter(installments::Column::TenantId.eq(tenant_id))
            .filter(
                installments::Column::Status.ne(sea_orm_active_enums::InstallmentStatus::Paid),
            )
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            tracing::warn!(
                tenant_id = %tenant_id,
                installment_id = %installment_id,
                "Installment collected concurrently"
            );
            return Err(InstallmentError::AlreadyPaid(installment_id).into());
        }

        invoices::Entity::update_many()
            .col_expr(
                invoices::Column::AmountPaid,
                Expr::col(invoices::Column::AmountPaid).add(principal),
            )
            .filter(invoices::Column::Id.eq(current.invoice_id))
            .filter(invoices::Column::TenantId.eq(tenant_id))
            .exec(&txn)
            .await?;
        let invoice = invoices::Entity::find_by_id(current.invoice_id)
            .filter(invoices::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(InstallmentError::InvoiceNotFound(current.invoice_id))?;
        let status = PaymentStatus::from_amounts(invoice.total_amount, invoice.amount_paid);
        let mut active: invoices::ActiveModel = invoice.into();
        active.payment_status = Set(status.into());
        let invoice = active.update(&txn).await?;

        let cash = account::resolve_role_account(&txn, tenant_id, AccountRole::Cash).await?;
        let receivable =
            account::resolve_role_account(&txn, tenant_id, AccountRole::AccountsReceivable).await?;
        let entry_input = CreateJournalEntryInput::posted(
            payment_date,
            format!(
                "Installment {} of invoice {}",
                current.sequence, invoice.invoice_number
            ),
            vec![
                JournalLineInput::debit(cash.id, due),
                JournalLineInput::credit(receivable.id, due),
            ],
        )
        .with_reference(invoice.invoice_number.clone());
        let entry =
            journal::insert_entry(&txn, tenant_id, &entry_input, None, &self.ledger).await?;

        let paid = installments::Entity::find_by_id(installment_id)
            .filter(installments::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?
            .ok_or(InstallmentError::NotFound(installment_id))?;
        let mut active: installments::ActiveModel = paid.into();
        active.journal_entry_id = Set(Some(entry.entry.id));
        let installment = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            installment_id = %installment_id,
            invoice_id = %invoice.id,
            entry_id = %entry.entry.id,
            amount = %due,
            "Installment collected"
        );
        Ok(CollectedInstallment {
            installment,
            invoice,
            entry,
        })
    }

    /// Lists installments by due date with the derived overdue flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_installments(
        &self,
        tenant_id: Uuid,
        filter: InstallmentFilter,
        today: NaiveDate,
    ) -> RepoResult<Vec<InstallmentView>> {
        let mut query = installments::Entity::find()
            .filter(installments::Column::TenantId.eq(tenant_id));

        if let Some(customer_id) = filter.customer_id {
            query = query.filter(installments::Column::CustomerId.eq(customer_id));
        }
        if let Some(invoice_id) = filter.invoice_id {
            query = query.filter(installments::Column::InvoiceId.eq(invoice_id));
        }
        if filter.overdue_only {
            query = query
                .filter(installments::Column::DueDate.lt(today))
                .filter(
                    installments::Column::Status
                        .ne(sea_orm_active_enums::InstallmentStatus::Paid),
                );
        }

        let rows = query
            .order_by_asc(installments::Column::DueDate)
            .order_by_asc(installments::Column::Sequence)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|installment| {
                let overdue = is_overdue(
                    installment.due_date,
                    InstallmentStatus::from(installment.status),
                    today,
                );
                InstallmentView {
                    installment,
                    overdue,
                }
            })
            .collect())
    }
}
