//! Per-call tenant context.

use serde::{Deserialize, Serialize};

use super::id::{TenantId, UserId};

/// The `{tenantId, userId}` pair supplied by the session layer.
///
/// Passed explicitly into every core call. The core trusts it and performs
/// no authentication of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantContext {
    /// Isolation boundary for every query.
    pub tenant_id: TenantId,
    /// Acting user (cashier for shifts).
    pub user_id: UserId,
}

impl TenantContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(tenant_id: TenantId, user_id: UserId) -> Self {
        Self { tenant_id, user_id }
    }
}
