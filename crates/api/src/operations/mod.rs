//! `LedgerApi` operations, one module per component.

pub mod chart;
pub mod documents;
pub mod installments;
pub mod ledger;
pub mod shifts;
pub mod statements;
