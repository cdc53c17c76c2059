//! Common types used across the application.

pub mod id;
pub mod money;
pub mod tenant;

pub use id::*;
pub use money::{BALANCE_TOLERANCE, CURRENCY_DECIMALS, is_within_tolerance, round_money};
pub use tenant::TenantContext;
