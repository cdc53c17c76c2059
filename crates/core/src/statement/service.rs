//! Statement folding.

use rust_decimal::Decimal;

use super::types::{
    DateRange, OpeningBalancePolicy, Statement, StatementLine, StatementRow, StatementSubject,
};
use crate::chart::NormalSide;
use crate::ledger::AccountBalance;

/// Stateless statement builder.
pub struct StatementService;

impl StatementService {
    /// Sorts rows by `(date, sequence, id)`.
    ///
    /// The sort is stable and total, so equal inputs always come out in the
    /// same order.
    pub fn sort_rows(rows: &mut [StatementRow]) {
        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.sequence.cmp(&b.sequence))
                .then(a.id.cmp(&b.id))
        });
    }

    /// Builds a statement from unordered rows.
    ///
    /// Rows after the window are ignored. Rows before it are ignored under
    /// [`OpeningBalancePolicy::Stored`] and folded into the opening balance
    /// under [`OpeningBalancePolicy::CarryForward`].
    #[must_use]
    pub fn build(
        subject: StatementSubject,
        side: NormalSide,
        stored_opening: Decimal,
        policy: OpeningBalancePolicy,
        range: DateRange,
        mut rows: Vec<StatementRow>,
    ) -> Statement {
        Self::sort_rows(&mut rows);

        let prior = rows.iter().filter(|r| range.is_before(r.date));
        let opening_balance = match policy {
            OpeningBalancePolicy::Stored => stored_opening,
            OpeningBalancePolicy::CarryForward => {
                AccountBalance::opening(side, stored_opening)
                    .fold(prior.map(|r| (r.debit, r.credit)))
                    .balance
            }
        };

        let mut running = AccountBalance::opening(side, opening_balance);
        let lines: Vec<StatementLine> = rows
            .into_iter()
            .filter(|r| !range.is_before(r.date) && !range.is_after(r.date))
            .map(|r| {
                let balance = running.apply(r.debit, r.credit);
                StatementLine {
                    date: r.date,
                    id: r.id,
                    source: r.source,
                    reference: r.reference,
                    description: r.description,
                    debit: r.debit,
                    credit: r.credit,
                    balance,
                }
            })
            .collect();

        Statement {
            subject,
            normal_side: side,
            range,
            opening_balance,
            lines,
            total_debit: running.debit_total,
            total_credit: running.credit_total,
            net_balance: running.balance,
        }
    }
}
