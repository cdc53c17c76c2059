//! Account and party statements.

use tallybook_core::statement::{DateRange, OpeningBalancePolicy, Statement, StatementSubject};
use tallybook_shared::{OpResult, TenantContext};

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// Builds a running-balance statement for an account or a party.
    pub async fn get_statement(
        &self,
        ctx: &TenantContext,
        subject: StatementSubject,
        range: DateRange,
        policy: OpeningBalancePolicy,
    ) -> OpResult<Statement> {
        let result = self
            .statements
            .get_statement(ctx.tenant_id.into_inner(), subject, range, policy)
            .await;
        respond("get_statement", ctx, result)
    }
}
