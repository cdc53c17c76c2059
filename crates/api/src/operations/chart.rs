//! Chart of accounts, parties and fiscal years.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use tallybook_core::chart::{AccountRole, PartyType};
use tallybook_db::entities::{account_roles, accounts, fiscal_years};
use tallybook_db::repositories::{AccountFilter, CreateAccountInput, PartyRecord};
use tallybook_shared::{OpResult, TenantContext};

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// Creates an account in the caller's tenant.
    pub async fn create_account(
        &self,
        ctx: &TenantContext,
        input: CreateAccountInput,
    ) -> OpResult<accounts::Model> {
        let result = self
            .accounts
            .create_account(ctx.tenant_id.into_inner(), input)
            .await;
        respond("create_account", ctx, result)
    }

    /// Gets an account; cross-tenant ids are not found.
    pub async fn get_account(
        &self,
        ctx: &TenantContext,
        account_id: Uuid,
    ) -> OpResult<accounts::Model> {
        let result = self
            .accounts
            .find_account(ctx.tenant_id.into_inner(), account_id)
            .await;
        respond("get_account", ctx, result)
    }

    /// Lists accounts ordered by code.
    pub async fn list_accounts(
        &self,
        ctx: &TenantContext,
        filter: AccountFilter,
    ) -> OpResult<Vec<accounts::Model>> {
        let result = self
            .accounts
            .list_accounts(ctx.tenant_id.into_inner(), filter)
            .await;
        respond("list_accounts", ctx, result)
    }

    /// Returns the account playing `role`, creating it on first use.
    pub async fn resolve_or_create_role_account(
        &self,
        ctx: &TenantContext,
        role: AccountRole,
    ) -> OpResult<accounts::Model> {
        let result = self
            .accounts
            .resolve_or_create_role_account(ctx.tenant_id.into_inner(), role)
            .await;
        respond("resolve_or_create_role_account", ctx, result)
    }

    /// Points `role` at an explicit account.
    pub async fn assign_role(
        &self,
        ctx: &TenantContext,
        role: AccountRole,
        account_id: Uuid,
    ) -> OpResult<account_roles::Model> {
        let result = self
            .accounts
            .assign_role(ctx.tenant_id.into_inner(), role, account_id)
            .await;
        respond("assign_role", ctx, result)
    }

    /// Returns a party's sub-ledger account, creating it on first use.
    pub async fn resolve_party_account(
        &self,
        ctx: &TenantContext,
        party_type: PartyType,
        party_id: Uuid,
    ) -> OpResult<accounts::Model> {
        let result = self
            .accounts
            .resolve_party_account(ctx.tenant_id.into_inner(), party_type, party_id)
            .await;
        respond("resolve_party_account", ctx, result)
    }

    /// Creates a customer.
    pub async fn create_customer(
        &self,
        ctx: &TenantContext,
        name: &str,
        opening_balance: Decimal,
    ) -> OpResult<PartyRecord> {
        let result = self
            .parties
            .create_customer(ctx.tenant_id.into_inner(), name, opening_balance)
            .await;
        respond("create_customer", ctx, result)
    }

    /// Creates a supplier.
    pub async fn create_supplier(
        &self,
        ctx: &TenantContext,
        name: &str,
        opening_balance: Decimal,
    ) -> OpResult<PartyRecord> {
        let result = self
            .parties
            .create_supplier(ctx.tenant_id.into_inner(), name, opening_balance)
            .await;
        respond("create_supplier", ctx, result)
    }

    /// Creates an open fiscal year.
    pub async fn create_fiscal_year(
        &self,
        ctx: &TenantContext,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> OpResult<fiscal_years::Model> {
        let result = self
            .fiscal
            .create_fiscal_year(ctx.tenant_id.into_inner(), name, start_date, end_date)
            .await;
        respond("create_fiscal_year", ctx, result)
    }

    /// Closes a fiscal year to further postings.
    pub async fn close_fiscal_year(
        &self,
        ctx: &TenantContext,
        fiscal_year_id: Uuid,
    ) -> OpResult<fiscal_years::Model> {
        let result = self
            .fiscal
            .close_fiscal_year(ctx.tenant_id.into_inner(), fiscal_year_id)
            .await;
        respond("close_fiscal_year", ctx, result)
    }
}
