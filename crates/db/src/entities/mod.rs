//! `SeaORM` entity definitions.

pub mod account_roles;
pub mod accounts;
pub mod customers;
pub mod document_sequences;
pub mod fiscal_years;
pub mod installments;
pub mod invoices;
pub mod journal_entries;
pub mod journal_lines;
pub mod purchase_invoices;
pub mod sea_orm_active_enums;
pub mod shifts;
pub mod suppliers;
pub mod tenants;
pub mod vouchers;
