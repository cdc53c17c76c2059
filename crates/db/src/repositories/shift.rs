//! Shift repository: cash-drawer sessions.
//!
//! One open shift per (tenant, user), backed by a partial unique index.
//! Summaries only count invoices and vouchers linked by `shift_id`.

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use tallybook_core::shift::{
    CashVoucherFact, Reconciliation, SaleFact, ShiftError, ShiftService, ShiftSummary,
};

use crate::entities::{invoices, sea_orm_active_enums, shifts, vouchers};
use crate::error::{RepoError, RepoResult, is_unique_violation};
use crate::repositories::sequence::{self, SequenceKind};

/// A closed shift with the figures it was closed on.
#[derive(Debug, Clone, Serialize)]
pub struct ClosedShift {
    /// Shift row, now closed.
    pub shift: shifts::Model,
    /// Activity during the shift.
    pub summary: ShiftSummary,
    /// Counted versus expected cash.
    pub reconciliation: Reconciliation,
}

async fn find_shift<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    shift_id: Uuid,
) -> RepoResult<shifts::Model> {
    Ok(shifts::Entity::find_by_id(shift_id)
        .filter(shifts::Column::TenantId.eq(tenant_id))
        .one(conn)
        .await?
        .ok_or(ShiftError::NotFound(shift_id))?)
}

/// Aggregates the sales and vouchers linked to a shift.
async fn summarize<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    shift_id: Uuid,
) -> RepoResult<ShiftSummary> {
    let sales: Vec<SaleFact> = invoices::Entity::find()
        .filter(invoices::Column::TenantId.eq(tenant_id))
        .filter(invoices::Column::ShiftId.eq(shift_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|i| SaleFact {
            payment_method: i.payment_method.into(),
            payment_status: i.payment_status.into(),
            total_amount: i.total_amount,
            amount_paid: i.amount_paid,
        })
        .collect();

    let cash_vouchers: Vec<CashVoucherFact> = vouchers::Entity::find()
        .filter(vouchers::Column::TenantId.eq(tenant_id))
        .filter(vouchers::Column::ShiftId.eq(shift_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|v| CashVoucherFact {
            voucher_type: v.voucher_type.into(),
            amount: v.amount,
        })
        .collect();

    Ok(ShiftService::summarize(&sales, &cash_vouchers))
}

/// Shift repository.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    db: DatabaseConnection,
}

impl ShiftRepository {
    /// Creates a new shift repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a shift for a cashier with an opening float.
    ///
    /// # Errors
    ///
    /// `AlreadyOpen` if the user holds an open shift in the tenant,
    /// `NegativeAmount` for a negative float.
    pub async fn open_shift(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        start_balance: Decimal,
    ) -> RepoResult<shifts::Model> {
        ShiftService::validate_start_balance(start_balance)?;

        let txn = self.db.begin().await?;

        if current_shift(&txn, tenant_id, user_id).await?.is_some() {
            return Err(ShiftError::AlreadyOpen.into());
        }

        let shift_number = sequence::next_value(&txn, tenant_id, SequenceKind::Shift).await?;
        let shift = shifts::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            user_id: Set(user_id),
            shift_number: Set(shift_number),
            start_time: Set(chrono::Utc::now().into()),
            end_time: Set(None),
            start_balance: Set(start_balance),
            end_balance: Set(None),
            expected_cash: Set(None),
            variance: Set(None),
            system_cash_balance: Set(None),
            system_visa_balance: Set(None),
            system_unpaid_balance: Set(None),
            notes: Set(None),
            status: Set(sea_orm_active_enums::ShiftStatus::Open),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::from(ShiftError::AlreadyOpen)
            } else {
                RepoError::from(e)
            }
        })?;

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            user_id = %user_id,
            shift_id = %shift.id,
            shift_number = shift.shift_number,
            "Shift opened"
        );
        Ok(shift)
    }

    /// Returns the user's open shift, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_current_shift(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<shifts::Model>> {
        current_shift(&self.db, tenant_id, user_id).await
    }

    /// Gets a shift inside the tenant.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or cross-tenant ids.
    pub async fn get_shift(&self, tenant_id: Uuid, shift_id: Uuid) -> RepoResult<shifts::Model> {
        find_shift(&self.db, tenant_id, shift_id).await
    }

    /// Lists the tenant's shifts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_shifts(&self, tenant_id: Uuid) -> RepoResult<Vec<shifts::Model>> {
        Ok(shifts::Entity::find()
            .filter(shifts::Column::TenantId.eq(tenant_id))
            .order_by_desc(shifts::Column::ShiftNumber)
            .all(&self.db)
            .await?)
    }

    /// Aggregates sales and vouchers recorded against a shift.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or cross-tenant ids.
    pub async fn get_shift_summary(
        &self,
        tenant_id: Uuid,
        shift_id: Uuid,
    ) -> RepoResult<ShiftSummary> {
        find_shift(&self.db, tenant_id, shift_id).await?;
        summarize(&self.db, tenant_id, shift_id).await
    }

    /// Closes a shift against the counted cash.
    ///
    /// The row is locked, the summary is computed in the same transaction
    /// and the close is a conditional update on `status = 'open'`. Variance
    /// is recorded only; no ledger entry is posted for it.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or cross-tenant ids, `AlreadyClosed` if the
    /// shift is closed (including by a concurrent close),
    /// `NegativeAmount` for negative counted cash.
    pub async fn close_shift(
        &self,
        tenant_id: Uuid,
        shift_id: Uuid,
        actual_cash: Decimal,
        notes: Option<String>,
    ) -> RepoResult<ClosedShift> {
        let txn = self.db.begin().await?;

        let shift = shifts::Entity::find_by_id(shift_id)
            .filter(shifts::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ShiftError::NotFound(shift_id))?;
        ShiftService::validate_can_close(shift_id, shift.status.into())?;

        let summary = summarize(&txn, tenant_id, shift_id).await?;
        let reconciliation = ShiftService::reconcile(shift.start_balance, &summary, actual_cash)?;
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let result = shifts::Entity::update_many()
            .col_expr(shifts::Column::EndTime, Expr::value(chrono::Utc::now().fixed_offset()))
            .col_expr(shifts::Column::EndBalance, Expr::value(reconciliation.actual_cash))
            .col_expr(shifts::Column::ExpectedCash, Expr::value(reconciliation.expected_cash))
            .col_expr(shifts::Column::Variance, Expr::value(reconciliation.variance))
            .col_expr(shifts::Column::SystemCashBalance, Expr::value(summary.cash_sales))
            .col_expr(shifts::Column::SystemVisaBalance, Expr::value(summary.visa_sales))
            .col_expr(shifts::Column::SystemUnpaidBalance, Expr::value(summary.unpaid_sales))
            .col_expr(shifts::Column::Notes, Expr::value(notes))
            .col_expr(
                shifts::Column::Status,
                Expr::value(sea_orm_active_enums::ShiftStatus::Closed),
            )
            .filter(shifts::Column::Id.eq(shift_id))
            .filter(shifts::Column::TenantId.eq(tenant_id))
            .filter(shifts::Column::Status.eq(sea_orm_active_enums::ShiftStatus::Open))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            tracing::warn!(
                tenant_id = %tenant_id,
                shift_id = %shift_id,
                "Shift closed concurrently"
            );
            return Err(ShiftError::AlreadyClosed(shift_id).into());
        }

        let shift = find_shift(&txn, tenant_id, shift_id).await?;
        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            shift_id = %shift_id,
            expected_cash = %reconciliation.expected_cash,
            actual_cash = %reconciliation.actual_cash,
            variance = %reconciliation.variance,
            "Shift closed"
        );
        Ok(ClosedShift {
            shift,
            summary,
            reconciliation,
        })
    }
}

async fn current_shift<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    user_id: Uuid,
) -> RepoResult<Option<shifts::Model>> {
    Ok(shifts::Entity::find()
        .filter(shifts::Column::TenantId.eq(tenant_id))
        .filter(shifts::Column::UserId.eq(user_id))
        .filter(shifts::Column::Status.eq(sea_orm_active_enums::ShiftStatus::Open))
        .one(conn)
        .await?)
}
