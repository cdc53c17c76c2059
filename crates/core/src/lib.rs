//! Core business logic for Tallybook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `chart` - Account types, semantic role accounts, code generation
//! - `ledger` - Double-entry validation, vouchers, reversals
//! - `statement` - Running-balance statements
//! - `installment` - Amortization schedules and the overdue predicate
//! - `shift` - Cash-drawer reconciliation
//! - `invoice` - Payment status/method of externally captured invoices

pub mod chart;
pub mod installment;
pub mod invoice;
pub mod ledger;
pub mod shift;
pub mod statement;
