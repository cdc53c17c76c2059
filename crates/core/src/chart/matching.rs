//! Role-account lookup and code allocation.
//!
//! The explicit role mapping is authoritative. The fuzzy match here only runs
//! when no mapping exists yet, so a tenant's existing chart is adopted instead
//! of duplicated.

use uuid::Uuid;

use super::types::{AccountRole, AccountType};

/// Minimal view of an existing account used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCandidate {
    /// Account id.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
}

/// Finds an existing account that plausibly plays `role`.
///
/// Name hints win over code prefixes; among equal matches the lowest code wins.
/// Only accounts of the role's type are considered.
#[must_use]
pub fn find_role_match(
    role: AccountRole,
    candidates: &[AccountCandidate],
) -> Option<&AccountCandidate> {
    let spec = role.spec();
    let mut typed: Vec<&AccountCandidate> = candidates
        .iter()
        .filter(|c| c.account_type == spec.account_type)
        .collect();
    typed.sort_by(|a, b| a.code.cmp(&b.code));

    let by_name = typed.iter().copied().find(|c| {
        let name = c.name.trim().to_lowercase();
        spec.name_hints.iter().any(|hint| name.contains(hint))
    });

    by_name.or_else(|| {
        typed
            .into_iter()
            .find(|c| c.code.trim().starts_with(spec.code_prefix))
    })
}

/// Allocates the first free code `prefix` + two digits (`1001`, `1002`, ...).
#[must_use]
pub fn next_role_code<S: AsRef<str>>(prefix: &str, existing: &[S]) -> Option<String> {
    (1..100)
        .map(|n| format!("{prefix}{n:02}"))
        .find(|code| !existing.iter().any(|e| e.as_ref() == code))
}

/// Allocates the first free sub-ledger code under a parent (`1201-0001`, ...).
#[must_use]
pub fn next_child_code<S: AsRef<str>>(parent_code: &str, existing: &[S]) -> Option<String> {
    (1..10_000)
        .map(|n| format!("{parent_code}-{n:04}"))
        .find(|code| !existing.iter().any(|e| e.as_ref() == code))
}
