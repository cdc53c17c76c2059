//! Fiscal year repository.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use tallybook_core::ledger::{
    FiscalYearInfo, FiscalYearStatus, LedgerError, find_fiscal_year, validate_new_year,
};

use crate::entities::{fiscal_years, sea_orm_active_enums};
use crate::error::RepoResult;

impl From<&fiscal_years::Model> for FiscalYearInfo {
    fn from(model: &fiscal_years::Model) -> Self {
        Self {
            id: model.id,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.into(),
        }
    }
}

/// Resolves the fiscal year an entry dated `date` posts into.
///
/// An explicit id must belong to the tenant; otherwise the year covering the
/// date is used, preferring an open one. The result is checked for posting.
pub(crate) async fn resolve_for_posting<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    explicit: Option<Uuid>,
    date: NaiveDate,
) -> RepoResult<FiscalYearInfo> {
    let year = if let Some(id) = explicit {
        let model = fiscal_years::Entity::find_by_id(id)
            .filter(fiscal_years::Column::TenantId.eq(tenant_id))
            .one(conn)
            .await?
            .ok_or(LedgerError::FiscalYearNotFound(id))?;
        FiscalYearInfo::from(&model)
    } else {
        let covering: Vec<FiscalYearInfo> = fiscal_years::Entity::find()
            .filter(fiscal_years::Column::TenantId.eq(tenant_id))
            .filter(fiscal_years::Column::StartDate.lte(date))
            .filter(fiscal_years::Column::EndDate.gte(date))
            .all(conn)
            .await?
            .iter()
            .map(FiscalYearInfo::from)
            .collect();
        find_fiscal_year(&covering, date)?
    };

    year.validate_posting(date)?;
    Ok(year)
}

/// Fiscal year repository.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DatabaseConnection,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an open fiscal year.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty range, `Conflict` when it overlaps an existing year.
    pub async fn create_fiscal_year(
        &self,
        tenant_id: Uuid,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepoResult<fiscal_years::Model> {
        let txn = self.db.begin().await?;

        let existing: Vec<FiscalYearInfo> = fiscal_years::Entity::find()
            .filter(fiscal_years::Column::TenantId.eq(tenant_id))
            .all(&txn)
            .await?
            .iter()
            .map(FiscalYearInfo::from)
            .collect();
        validate_new_year(start_date, end_date, &existing)?;

        let year = fiscal_years::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            name: Set(name.trim().to_string()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            status: Set(sea_orm_active_enums::FiscalYearStatus::Open),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(tenant_id = %tenant_id, fiscal_year_id = %year.id, "Fiscal year created");
        Ok(year)
    }

    /// Closes a fiscal year; no further postings are accepted into it.
    ///
    /// # Errors
    ///
    /// `FiscalYearNotFound` for unknown or cross-tenant ids,
    /// `FiscalYearAlreadyClosed` if it is closed.
    pub async fn close_fiscal_year(
        &self,
        tenant_id: Uuid,
        fiscal_year_id: Uuid,
    ) -> RepoResult<fiscal_years::Model> {
        let year = fiscal_years::Entity::find_by_id(fiscal_year_id)
            .filter(fiscal_years::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::FiscalYearNotFound(fiscal_year_id))?;

        if FiscalYearStatus::from(year.status) == FiscalYearStatus::Closed {
            return Err(LedgerError::FiscalYearAlreadyClosed(fiscal_year_id).into());
        }

        let mut active: fiscal_years::ActiveModel = year.into();
        active.status = Set(sea_orm_active_enums::FiscalYearStatus::Closed);
        let year = active.update(&self.db).await?;

        tracing::info!(
            tenant_id = %tenant_id,
            fiscal_year_id = %fiscal_year_id,
            "Fiscal year closed"
        );
        Ok(year)
    }

    /// Lists the tenant's fiscal years, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_fiscal_years(&self, tenant_id: Uuid) -> RepoResult<Vec<fiscal_years::Model>> {
        Ok(fiscal_years::Entity::find()
            .filter(fiscal_years::Column::TenantId.eq(tenant_id))
            .order_by_asc(fiscal_years::Column::StartDate)
            .all(&self.db)
            .await?)
    }
}
