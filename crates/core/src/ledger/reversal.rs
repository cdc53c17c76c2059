//! Reversing entries for posted journal entries.
//!
//! Posted entries are never edited; a correction is a new entry with every
//! debit and credit swapped.

use super::types::{JournalLineInput, ResolvedLine};

/// Stateless builder of reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Swaps debits and credits of the original lines.
    #[must_use]
    pub fn reversing_lines(original: &[ResolvedLine]) -> Vec<JournalLineInput> {
        original
            .iter()
            .map(|line| JournalLineInput {
                account_id: line.account_id,
                debit: line.credit,
                credit: line.debit,
                description: Some(format!(
                    "Reversal: {}",
                    line.description.clone().unwrap_or_default()
                )),
            })
            .collect()
    }

    /// Description of the reversing entry.
    #[must_use]
    pub fn description(original_number: &str, reason: &str) -> String {
        let reason = reason.trim();
        if reason.is_empty() {
            format!("Reversal of {original_number}")
        } else {
            format!("Reversal of {original_number}. Reason: {reason}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::JournalTotals;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn line(debit: Decimal, credit: Decimal) -> ResolvedLine {
        ResolvedLine {
            account_id: Uuid::new_v4(),
            debit,
            credit,
            description: Some("Sale".into()),
        }
    }

    #[test]
    fn test_sides_are_swapped() {
        let original = vec![
            line(Decimal::new(500, 0), Decimal::ZERO),
            line(Decimal::ZERO, Decimal::new(500, 0)),
        ];
        let reversed = ReversalService::reversing_lines(&original);
        assert_eq!(reversed[0].credit, Decimal::new(500, 0));
        assert_eq!(reversed[0].debit, Decimal::ZERO);
        assert_eq!(reversed[1].debit, Decimal::new(500, 0));
        assert_eq!(reversed[0].account_id, original[0].account_id);
        assert_eq!(reversed[0].description.as_deref(), Some("Reversal: Sale"));
    }

    #[test]
    fn test_description() {
        assert_eq!(ReversalService::description("JE-000001", ""), "Reversal of JE-000001");
        assert_eq!(
            ReversalService::description("JE-000001", " typo "),
            "Reversal of JE-000001. Reason: typo"
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Original plus reversal nets every account to zero.
        #[test]
        fn prop_reversal_nets_to_zero(amounts in prop::collection::vec(1i64..1_000_000i64, 1..10)) {
            let mut original: Vec<ResolvedLine> = amounts
                .iter()
                .map(|a| line(Decimal::new(*a, 2), Decimal::ZERO))
                .collect();
            let total: i64 = amounts.iter().sum();
            original.push(line(Decimal::ZERO, Decimal::new(total, 2)));

            let reversed = ReversalService::reversing_lines(&original);
            for (o, r) in original.iter().zip(&reversed) {
                prop_assert_eq!(o.debit - o.credit + r.debit - r.credit, Decimal::ZERO);
            }
            let as_resolved: Vec<ResolvedLine> = reversed
                .into_iter()
                .map(|l| ResolvedLine {
                    account_id: l.account_id,
                    debit: l.debit,
                    credit: l.credit,
                    description: l.description,
                })
                .collect();
            prop_assert_eq!(JournalTotals::from_lines(&as_resolved).difference, Decimal::ZERO);
        }
    }
}
