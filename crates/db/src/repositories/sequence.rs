//! Per-tenant document counters.
//!
//! Each counter is one row in `document_sequences`, bumped with an upsert so
//! the first use creates it. The row lock taken by the upsert serializes
//! concurrent writers until the surrounding transaction ends.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::document_sequences;

/// Kinds of numbered documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// `JE-` journal entry numbers.
    JournalEntry,
    /// `RV-` receipt voucher numbers.
    ReceiptVoucher,
    /// `PV-` payment voucher numbers.
    PaymentVoucher,
    /// Shift numbers.
    Shift,
}

impl SequenceKind {
    /// Key stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JournalEntry => "journal_entry",
            Self::ReceiptVoucher => "receipt_voucher",
            Self::PaymentVoucher => "payment_voucher",
            Self::Shift => "shift",
        }
    }
}

/// Increments and returns the tenant's counter; the first value is 1.
///
/// Must be called on the connection of the transaction that consumes the
/// number, so a rollback also gives the number back.
pub(crate) async fn next_value<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    kind: SequenceKind,
) -> Result<i64, DbErr> {
    let seed = document_sequences::ActiveModel {
        tenant_id: Set(tenant_id),
        kind: Set(kind.as_str().to_string()),
        last_value: Set(1),
    };

    document_sequences::Entity::insert(seed)
        .on_conflict(
            OnConflict::columns([
                document_sequences::Column::TenantId,
                document_sequences::Column::Kind,
            ])
            .value(
                document_sequences::Column::LastValue,
                Expr::col((
                    document_sequences::Entity,
                    document_sequences::Column::LastValue,
                ))
                .add(1),
            )
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let row = document_sequences::Entity::find_by_id((tenant_id, kind.as_str().to_string()))
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("sequence {}", kind.as_str())))?;

    Ok(row.last_value)
}
