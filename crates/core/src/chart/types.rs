//! Chart of accounts domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables).
    Asset,
    /// Obligations (payables).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income.
    Revenue,
    /// Costs.
    Expense,
}

impl AccountType {
    /// Returns the side that increases this account's balance.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalSide::Credit,
        }
    }

    /// Lowercase storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// The side (debit or credit) that increases a balance.
///
/// - Asset/Expense (and customers): balance += debit - credit
/// - Liability/Equity/Revenue (and suppliers): balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debit-normal.
    Debit,
    /// Credit-normal.
    Credit,
}

impl NormalSide {
    /// Signed balance change of a single movement.
    #[must_use]
    pub fn delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Business party owning a sub-ledger account or a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    /// A customer (receivable side).
    Customer,
    /// A supplier (payable side).
    Supplier,
    /// No party; the caller names the counter-account directly.
    Other,
}

impl PartyType {
    /// Role account that parents this party's sub-ledger account.
    #[must_use]
    pub const fn control_role(self) -> Option<AccountRole> {
        match self {
            Self::Customer => Some(AccountRole::AccountsReceivable),
            Self::Supplier => Some(AccountRole::AccountsPayable),
            Self::Other => None,
        }
    }

    /// Balance side used by party statements.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Customer | Self::Other => NormalSide::Debit,
            Self::Supplier => NormalSide::Credit,
        }
    }

    /// Prefix for the display name of the party's sub-ledger account.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Supplier => "Supplier",
            Self::Other => "Other",
        }
    }
}

/// Semantic role an account plays in generated postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    /// Cash drawer / cash on hand.
    Cash,
    /// Trade receivables.
    AccountsReceivable,
    /// Trade payables.
    AccountsPayable,
    /// Sales revenue.
    Revenue,
    /// General expense.
    Expense,
}

/// Static description of how a role account is found or provisioned.
#[derive(Debug, Clone, Copy)]
pub struct RoleSpec {
    /// Name fragments accepted by the fuzzy fallback match.
    pub name_hints: &'static [&'static str],
    /// Code prefix accepted by the fuzzy fallback and used for new codes.
    pub code_prefix: &'static str,
    /// Type of the provisioned account.
    pub account_type: AccountType,
    /// Name of the provisioned account.
    pub default_name: &'static str,
}

impl AccountRole {
    /// All roles, in provisioning order.
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::AccountsReceivable,
        Self::AccountsPayable,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the provisioning rules for this role.
    #[must_use]
    pub const fn spec(self) -> RoleSpec {
        match self {
            Self::Cash => RoleSpec {
                name_hints: &["cash", "treasury", "drawer"],
                code_prefix: "10",
                account_type: AccountType::Asset,
                default_name: "Cash",
            },
            Self::AccountsReceivable => RoleSpec {
                name_hints: &["receivable", "customers", "debtors"],
                code_prefix: "12",
                account_type: AccountType::Asset,
                default_name: "Accounts Receivable",
            },
            Self::AccountsPayable => RoleSpec {
                name_hints: &["payable", "suppliers", "creditors"],
                code_prefix: "21",
                account_type: AccountType::Liability,
                default_name: "Accounts Payable",
            },
            Self::Revenue => RoleSpec {
                name_hints: &["sales", "revenue", "income"],
                code_prefix: "40",
                account_type: AccountType::Revenue,
                default_name: "Sales Revenue",
            },
            Self::Expense => RoleSpec {
                name_hints: &["expense", "expenses"],
                code_prefix: "50",
                account_type: AccountType::Expense,
                default_name: "General Expenses",
            },
        }
    }

    /// Storage key of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::AccountsReceivable => "AR",
            Self::AccountsPayable => "AP",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown account role: {s}"))
    }
}
