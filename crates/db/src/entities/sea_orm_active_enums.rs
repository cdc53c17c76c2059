//! Enum columns, stored as short strings so the schema stays portable.
//!
//! Each enum mirrors a `tallybook-core` domain enum and converts both ways.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tallybook_core::{chart, installment, invoice, ledger, shift};

macro_rules! mirror_enum {
    ($name:ident => $core:path { $($variant:ident = $value:literal),+ $(,)? }) => {
        #[doc = concat!("Stored form of [`", stringify!($core), "`].")]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            EnumIter,
            DeriveActiveEnum,
            Serialize,
            Deserialize,
        )]
        #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                #[sea_orm(string_value = $value)]
                $variant,
            )+
        }

        impl From<$core> for $name {
            fn from(value: $core) -> Self {
                use $core as Core;
                match value {
                    $(Core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$name> for $core {
            fn from(value: $name) -> Self {
                use $core as Core;
                match value {
                    $($name::$variant => Core::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(AccountType => chart::AccountType {
    Asset = "asset",
    Liability = "liability",
    Equity = "equity",
    Revenue = "revenue",
    Expense = "expense",
});

mirror_enum!(AccountRole => chart::AccountRole {
    Cash = "CASH",
    AccountsReceivable = "AR",
    AccountsPayable = "AP",
    Revenue = "REVENUE",
    Expense = "EXPENSE",
});

mirror_enum!(PartyType => chart::PartyType {
    Customer = "customer",
    Supplier = "supplier",
    Other = "other",
});

mirror_enum!(JournalStatus => ledger::JournalStatus {
    Draft = "draft",
    Posted = "posted",
});

mirror_enum!(FiscalYearStatus => ledger::FiscalYearStatus {
    Open = "open",
    Closed = "closed",
});

mirror_enum!(VoucherType => ledger::VoucherType {
    Receipt = "receipt",
    Payment = "payment",
});

mirror_enum!(PaymentStatus => invoice::PaymentStatus {
    Unpaid = "unpaid",
    Partial = "partial",
    Paid = "paid",
});

mirror_enum!(PaymentMethod => invoice::PaymentMethod {
    Cash = "cash",
    Visa = "visa",
    Other = "other",
});

mirror_enum!(InstallmentStatus => installment::InstallmentStatus {
    Pending = "pending",
    PartiallyPaid = "partially_paid",
    Paid = "paid",
});

mirror_enum!(ShiftStatus => shift::ShiftStatus {
    Open = "open",
    Closed = "closed",
});
