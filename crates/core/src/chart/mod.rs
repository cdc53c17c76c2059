//! Chart of accounts: account types, semantic roles, and role-account matching.
//!
//! Balances are never stored here; they are derived by folding journal lines.

pub mod error;
pub mod matching;
pub mod types;

pub use error::ChartError;
pub use matching::{AccountCandidate, find_role_match, next_child_code, next_role_code};
pub use types::{AccountRole, AccountType, NormalSide, PartyType, RoleSpec};
