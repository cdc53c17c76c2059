//! Customer and supplier repository.
//!
//! Parties are owned by the sales and purchasing modules; the ledger only
//! needs their identity and stored opening balance.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use uuid::Uuid;

use tallybook_core::chart::{ChartError, PartyType};

use crate::entities::{customers, suppliers};
use crate::error::RepoResult;

/// Identity of a customer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyRecord {
    /// Party id.
    pub id: Uuid,
    /// Customer or supplier.
    pub party_type: PartyType,
    /// Display name.
    pub name: String,
    /// Balance carried in from before the ledger.
    pub opening_balance: Decimal,
}

impl From<customers::Model> for PartyRecord {
    fn from(model: customers::Model) -> Self {
        Self {
            id: model.id,
            party_type: PartyType::Customer,
            name: model.name,
            opening_balance: model.opening_balance,
        }
    }
}

impl From<suppliers::Model> for PartyRecord {
    fn from(model: suppliers::Model) -> Self {
        Self {
            id: model.id,
            party_type: PartyType::Supplier,
            name: model.name,
            opening_balance: model.opening_balance,
        }
    }
}

/// Loads a customer or supplier inside the tenant.
///
/// `Other` is not a party and resolves as not found.
pub(crate) async fn find_party<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    party_type: PartyType,
    party_id: Uuid,
) -> RepoResult<PartyRecord> {
    let found = match party_type {
        PartyType::Customer => customers::Entity::find_by_id(party_id)
            .filter(customers::Column::TenantId.eq(tenant_id))
            .one(conn)
            .await?
            .map(PartyRecord::from),
        PartyType::Supplier => suppliers::Entity::find_by_id(party_id)
            .filter(suppliers::Column::TenantId.eq(tenant_id))
            .one(conn)
            .await?
            .map(PartyRecord::from),
        PartyType::Other => None,
    };

    Ok(found.ok_or(ChartError::PartyNotFound {
        party_type,
        party_id,
    })?)
}

/// Customer and supplier repository.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    db: DatabaseConnection,
}

impl PartyRepository {
    /// Creates a new party repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for a blank name, or a database error.
    pub async fn create_customer(
        &self,
        tenant_id: Uuid,
        name: &str,
        opening_balance: Decimal,
    ) -> RepoResult<PartyRecord> {
        let name = non_blank(name)?;
        let customer = customers::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            name: Set(name),
            opening_balance: Set(opening_balance),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(tenant_id = %tenant_id, customer_id = %customer.id, "Customer created");
        Ok(customer.into())
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for a blank name, or a database error.
    pub async fn create_supplier(
        &self,
        tenant_id: Uuid,
        name: &str,
        opening_balance: Decimal,
    ) -> RepoResult<PartyRecord> {
        let name = non_blank(name)?;
        let supplier = suppliers::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            name: Set(name),
            opening_balance: Set(opening_balance),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(tenant_id = %tenant_id, supplier_id = %supplier.id, "Supplier created");
        Ok(supplier.into())
    }

    /// Finds a customer or supplier inside the tenant.
    ///
    /// # Errors
    ///
    /// `PartyNotFound` for unknown or cross-tenant ids.
    pub async fn find_party(
        &self,
        tenant_id: Uuid,
        party_type: PartyType,
        party_id: Uuid,
    ) -> RepoResult<PartyRecord> {
        find_party(&self.db, tenant_id, party_type, party_id).await
    }

    /// Lists the tenant's customers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_customers(&self, tenant_id: Uuid) -> RepoResult<Vec<PartyRecord>> {
        let rows = customers::Entity::find()
            .filter(customers::Column::TenantId.eq(tenant_id))
            .order_by_asc(customers::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(PartyRecord::from).collect())
    }

    /// Lists the tenant's suppliers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_suppliers(&self, tenant_id: Uuid) -> RepoResult<Vec<PartyRecord>> {
        let rows = suppliers::Entity::find()
            .filter(suppliers::Column::TenantId.eq(tenant_id))
            .order_by_asc(suppliers::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(PartyRecord::from).collect())
    }
}

fn non_blank(name: &str) -> Result<String, ChartError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ChartError::EmptyName);
    }
    Ok(name.to_string())
}
