//! Account repository for chart of accounts database operations.
//!
//! Role accounts (cash, receivables, payables, revenue, expense) are found
//! through the `account_roles` mapping. A tenant without a mapping is
//! bootstrapped once: an existing account that looks like the role is
//! adopted, otherwise a new one is created, and the mapping is recorded.
//! Bootstrap holds a lock on the tenant row, so concurrent first uses
//! within a tenant run one after the other and the later ones reuse what
//! the first created.

use rust_decimal::Decimal;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tallybook_core::chart::{
    AccountCandidate, AccountRole, AccountType, ChartError, PartyType, find_role_match,
    next_child_code, next_role_code,
};

use crate::entities::{account_roles, accounts, sea_orm_active_enums, tenants};
use crate::error::{RepoError, RepoResult, is_unique_violation};
use crate::repositories::party;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (unique within the tenant).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account in the same tenant.
    pub parent_id: Option<Uuid>,
    /// Balance carried in from before the ledger.
    pub opening_balance: Decimal,
}

impl CreateAccountInput {
    /// A root account with a zero opening balance.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            parent_id: None,
            opening_balance: Decimal::ZERO,
        }
    }
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by parent ID (`Some(None)` = root accounts only).
    pub parent_id: Option<Option<Uuid>>,
}

/// Columns of a new account row.
struct NewAccount {
    code: String,
    name: String,
    account_type: AccountType,
    parent_id: Option<Uuid>,
    party: Option<(PartyType, Uuid)>,
    opening_balance: Decimal,
}

/// Loads an account inside the tenant.
pub(crate) async fn find_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    account_id: Uuid,
) -> RepoResult<Option<accounts::Model>> {
    Ok(accounts::Entity::find_by_id(account_id)
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .one(conn)
        .await?)
}

async fn tenant_codes<C: ConnectionTrait>(conn: &C, tenant_id: Uuid) -> RepoResult<Vec<String>> {
    Ok(accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| a.code)
        .collect())
}

async fn insert_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    new: NewAccount,
) -> RepoResult<accounts::Model> {
    let code = new.code;
    let account = accounts::ActiveModel {
        id: Set(Uuid::now_v7()),
        tenant_id: Set(tenant_id),
        code: Set(code.clone()),
        name: Set(new.name),
        account_type: Set(new.account_type.into()),
        parent_id: Set(new.parent_id),
        party_type: Set(new.party.map(|(t, _)| t.into())),
        party_id: Set(new.party.map(|(_, id)| id)),
        opening_balance: Set(new.opening_balance),
        created_at: Set(chrono::Utc::now().into()),
    };

    account.insert(conn).await.map_err(|e| {
        if is_unique_violation(&e) {
            RepoError::from(ChartError::DuplicateCode(code))
        } else {
            RepoError::from(e)
        }
    })
}

/// Serializes chart bootstrap within a tenant until the transaction ends.
///
/// `NO KEY UPDATE` leaves foreign-key inserts referencing the tenant free
/// to proceed.
async fn lock_tenant<C: ConnectionTrait>(conn: &C, tenant_id: Uuid) -> RepoResult<()> {
    tenants::Entity::find_by_id(tenant_id)
        .lock(LockType::NoKeyUpdate)
        .one(conn)
        .await?;
    Ok(())
}

/// Looks up the mapping of `role` and the account it points at, if it still exists.
async fn mapped_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    stored_role: sea_orm_active_enums::AccountRole,
) -> RepoResult<(Option<account_roles::Model>, Option<accounts::Model>)> {
    let mapping = account_roles::Entity::find()
        .filter(account_roles::Column::TenantId.eq(tenant_id))
        .filter(account_roles::Column::Role.eq(stored_role))
        .one(conn)
        .await?;
    let account = match &mapping {
        Some(mapping) => find_account(conn, tenant_id, mapping.account_id).await?,
        None => None,
    };
    Ok((mapping, account))
}

/// Returns the account mapped to `role`, bootstrapping the mapping on first use.
pub(crate) async fn resolve_role_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    role: AccountRole,
) -> RepoResult<accounts::Model> {
    let stored_role = sea_orm_active_enums::AccountRole::from(role);
    if let (_, Some(account)) = mapped_account(conn, tenant_id, stored_role).await? {
        return Ok(account);
    }

    lock_tenant(conn, tenant_id).await?;
    let (mapping, account) = mapped_account(conn, tenant_id, stored_role).await?;
    if let Some(account) = account {
        return Ok(account);
    }
    if let Some(mapping) = &mapping {
        tracing::warn!(
            tenant_id = %tenant_id,
            role = role.as_str(),
            account_id = %mapping.account_id,
            "Role mapping points at a missing account, rebuilding"
        );
    }

    let spec = role.spec();
    let tenant_accounts = accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .filter(accounts::Column::PartyId.is_null())
        .order_by_asc(accounts::Column::Code)
        .all(conn)
        .await?;
    let candidates: Vec<AccountCandidate> = tenant_accounts
        .iter()
        .map(|a| AccountCandidate {
            id: a.id,
            code: a.code.clone(),
            name: a.name.clone(),
            account_type: a.account_type.into(),
        })
        .collect();

    let account = if let Some(matched) = find_role_match(role, &candidates) {
        let matched_id = matched.id;
        tracing::info!(
            tenant_id = %tenant_id,
            role = role.as_str(),
            account_id = %matched_id,
            "Adopted existing account for role"
        );
        tenant_accounts
            .into_iter()
            .find(|a| a.id == matched_id)
            .ok_or(ChartError::AccountNotFound(matched_id))?
    } else {
        let codes = tenant_codes(conn, tenant_id).await?;
        let code = next_role_code(spec.code_prefix, &codes)
            .ok_or_else(|| ChartError::CodeSpaceExhausted(spec.code_prefix.to_string()))?;
        let created = insert_account(
            conn,
            tenant_id,
            NewAccount {
                code,
                name: spec.default_name.to_string(),
                account_type: spec.account_type,
                parent_id: None,
                party: None,
                opening_balance: Decimal::ZERO,
            },
        )
        .await?;
        tracing::info!(
            tenant_id = %tenant_id,
            role = role.as_str(),
            account_id = %created.id,
            code = %created.code,
            "Created account for role"
        );
        created
    };

    let now = chrono::Utc::now().into();
    match mapping {
        Some(stale) => {
            let version = stale.version + 1;
            let mut active: account_roles::ActiveModel = stale.into();
            active.account_id = Set(account.id);
            active.version = Set(version);
            active.updated_at = Set(now);
            active.update(conn).await?;
        }
        None => {
            account_roles::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(tenant_id),
                role: Set(stored_role),
                account_id: Set(account.id),
                version: Set(1),
                updated_at: Set(now),
            }
            .insert(conn)
            .await?;
        }
    }

    Ok(account)
}

async fn party_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    party_type: PartyType,
    party_id: Uuid,
) -> RepoResult<Option<accounts::Model>> {
    Ok(accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .filter(accounts::Column::PartyType.eq(sea_orm_active_enums::PartyType::from(party_type)))
        .filter(accounts::Column::PartyId.eq(party_id))
        .one(conn)
        .await?)
}

/// Returns the sub-ledger account of a customer or supplier, creating it
/// under the receivables or payables role account on first use.
pub(crate) async fn resolve_party_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    party_type: PartyType,
    party_id: Uuid,
) -> RepoResult<accounts::Model> {
    let role = party_type
        .control_role()
        .ok_or(ChartError::InvalidParty(party_type))?;
    let party = party::find_party(conn, tenant_id, party_type, party_id).await?;

    if let Some(account) = party_account(conn, tenant_id, party_type, party_id).await? {
        return Ok(account);
    }
    lock_tenant(conn, tenant_id).await?;
    if let Some(account) = party_account(conn, tenant_id, party_type, party_id).await? {
        return Ok(account);
    }

    let control = resolve_role_account(conn, tenant_id, role).await?;
    let siblings: Vec<String> = accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id))
        .filter(accounts::Column::ParentId.eq(control.id))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| a.code)
        .collect();
    let code = next_child_code(&control.code, &siblings)
        .ok_or_else(|| ChartError::CodeSpaceExhausted(control.code.clone()))?;

    let account = insert_account(
        conn,
        tenant_id,
        NewAccount {
            code,
            name: format!("{}: {}", party_type.label(), party.name),
            account_type: control.account_type.into(),
            parent_id: Some(control.id),
            party: Some((party_type, party_id)),
            opening_balance: Decimal::ZERO,
        },
    )
    .await?;

    tracing::info!(
        tenant_id = %tenant_id,
        party_id = %party_id,
        account_id = %account.id,
        code = %account.code,
        "Created party sub-ledger account"
    );
    Ok(account)
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Code or name is blank
    /// - Account code already exists in the tenant
    /// - Parent account does not exist in the tenant
    pub async fn create_account(
        &self,
        tenant_id: Uuid,
        input: CreateAccountInput,
    ) -> RepoResult<accounts::Model> {
        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();
        if code.is_empty() {
            return Err(ChartError::EmptyCode.into());
        }
        if name.is_empty() {
            return Err(ChartError::EmptyName.into());
        }

        let txn = self.db.begin().await?;

        let duplicate = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .filter(accounts::Column::Code.eq(&code))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(ChartError::DuplicateCode(code).into());
        }

        if let Some(parent_id) = input.parent_id {
            if find_account(&txn, tenant_id, parent_id).await?.is_none() {
                return Err(ChartError::ParentNotFound(parent_id).into());
            }
        }

        let account = insert_account(
            &txn,
            tenant_id,
            NewAccount {
                code,
                name,
                account_type: input.account_type,
                parent_id: input.parent_id,
                party: None,
                opening_balance: input.opening_balance,
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            account_id = %account.id,
            code = %account.code,
            "Account created"
        );
        Ok(account)
    }

    /// Finds an account inside the tenant.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` for unknown or cross-tenant ids.
    pub async fn find_account(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
    ) -> RepoResult<accounts::Model> {
        find_account(&self.db, tenant_id, account_id)
            .await?
            .ok_or_else(|| ChartError::AccountNotFound(account_id).into())
    }

    /// Lists the tenant's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        tenant_id: Uuid,
        filter: AccountFilter,
    ) -> RepoResult<Vec<accounts::Model>> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query = query.filter(
                accounts::Column::AccountType
                    .eq(sea_orm_active_enums::AccountType::from(account_type)),
            );
        }

        if let Some(parent_id) = filter.parent_id {
            query = match parent_id {
                Some(pid) => query.filter(accounts::Column::ParentId.eq(pid)),
                None => query.filter(accounts::Column::ParentId.is_null()),
            };
        }

        Ok(query.all(&self.db).await?)
    }

    /// Returns the account playing `role`, creating it if the tenant has none.
    ///
    /// # Errors
    ///
    /// `CodeSpaceExhausted` if no code is free under the role prefix, or a
    /// database error.
    pub async fn resolve_or_create_role_account(
        &self,
        tenant_id: Uuid,
        role: AccountRole,
    ) -> RepoResult<accounts::Model> {
        let txn = self.db.begin().await?;
        let account = resolve_role_account(&txn, tenant_id, role).await?;
        txn.commit().await?;
        Ok(account)
    }

    /// Points `role` at an explicit account, bumping the mapping version.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` for unknown or cross-tenant accounts.
    pub async fn assign_role(
        &self,
        tenant_id: Uuid,
        role: AccountRole,
        account_id: Uuid,
    ) -> RepoResult<account_roles::Model> {
        let txn = self.db.begin().await?;

        if find_account(&txn, tenant_id, account_id).await?.is_none() {
            return Err(ChartError::AccountNotFound(account_id).into());
        }

        let stored_role = sea_orm_active_enums::AccountRole::from(role);
        let now = chrono::Utc::now().into();
        let existing = account_roles::Entity::find()
            .filter(account_roles::Column::TenantId.eq(tenant_id))
            .filter(account_roles::Column::Role.eq(stored_role))
            .one(&txn)
            .await?;

        let mapping = match existing {
            Some(current) => {
                let version = current.version + 1;
                let mut active: account_roles::ActiveModel = current.into();
                active.account_id = Set(account_id);
                active.version = Set(version);
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                account_roles::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    tenant_id: Set(tenant_id),
                    role: Set(stored_role),
                    account_id: Set(account_id),
                    version: Set(1),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            role = role.as_str(),
            account_id = %account_id,
            version = mapping.version,
            "Role mapping assigned"
        );
        Ok(mapping)
    }

    /// Returns the sub-ledger account of a customer or supplier.
    ///
    /// # Errors
    ///
    /// `InvalidParty` for `Other`, `PartyNotFound` for unknown or
    /// cross-tenant parties.
    pub async fn resolve_party_account(
        &self,
        tenant_id: Uuid,
        party_type: PartyType,
        party_id: Uuid,
    ) -> RepoResult<accounts::Model> {
        let txn = self.db.begin().await?;
        let account = resolve_party_account(&txn, tenant_id, party_type, party_id).await?;
        txn.commit().await?;
        Ok(account)
    }
}
