//! `SeaORM` Entity for shifts table.
//!
//! Snapshot columns are written once, at close.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ShiftStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub shift_number: i64,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: Option<DateTimeWithTimeZone>,
    pub start_balance: Decimal,
    /// Counted cash.
    pub end_balance: Option<Decimal>,
    pub expected_cash: Option<Decimal>,
    pub variance: Option<Decimal>,
    pub system_cash_balance: Option<Decimal>,
    pub system_visa_balance: Option<Decimal>,
    pub system_unpaid_balance: Option<Decimal>,
    pub notes: Option<String>,
    pub status: ShiftStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
