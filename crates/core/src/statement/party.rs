//! Normalization of customer and supplier documents into statement rows.
//!
//! Customers are debit-normal (what they owe us), suppliers credit-normal
//! (what we owe them).

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{RowSource, StatementRow};
use crate::ledger::VoucherType;

/// A sales or purchase invoice as read for statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFact {
    /// Invoice id.
    pub id: Uuid,
    /// Issue date.
    pub date: NaiveDate,
    /// Insertion order.
    pub sequence: i64,
    /// Invoice number.
    pub number: String,
    /// Invoice total.
    pub total_amount: Decimal,
    /// Principal collected so far, installments included.
    pub amount_paid: Decimal,
    /// Interest added by an installment plan on this invoice.
    pub plan_interest: Decimal,
}

/// A receipt or payment voucher as read for statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherFact {
    /// Voucher id.
    pub id: Uuid,
    /// Voucher date.
    pub date: NaiveDate,
    /// Insertion order.
    pub sequence: i64,
    /// Voucher number.
    pub number: String,
    /// Receipt or payment.
    pub voucher_type: VoucherType,
    /// Amount.
    pub amount: Decimal,
    /// Free-text description.
    pub description: Option<String>,
}

/// A collected installment as read for statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentFact {
    /// Installment id.
    pub id: Uuid,
    /// Invoice the installment belongs to.
    pub invoice_id: Uuid,
    /// Collection date.
    pub paid_date: NaiveDate,
    /// Insertion order.
    pub sequence: i64,
    /// Amount collected, interest included.
    pub amount_paid: Decimal,
    /// Part of `amount_paid` applied to the invoice principal.
    pub principal_paid: Decimal,
}

fn row(
    date: NaiveDate,
    sequence: i64,
    id: Uuid,
    source: RowSource,
    reference: &str,
    description: String,
    (debit, credit): (Decimal, Decimal),
) -> StatementRow {
    StatementRow {
        date,
        sequence,
        id,
        source,
        reference: Some(reference.to_string()),
        description,
        debit,
        credit,
    }
}

fn voucher_description(voucher: &VoucherFact, fallback: &str) -> String {
    voucher
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map_or_else(|| format!("{fallback} {}", voucher.number), str::to_string)
}

/// Rows of a customer statement.
///
/// - invoice: debit the total
/// - plan interest: debit
/// - amount settled at sale (amount paid minus principal collected by installments): credit
/// - receipt voucher: credit; payment voucher (refund): debit
/// - collected installment: credit
#[must_use]
pub fn customer_rows(
    invoices: &[InvoiceFact],
    installments: &[InstallmentFact],
    vouchers: &[VoucherFact],
) -> Vec<StatementRow> {
    let mut collected: HashMap<Uuid, Decimal> = HashMap::new();
    for inst in installments {
        *collected.entry(inst.invoice_id).or_default() += inst.principal_paid;
    }
    let numbers: HashMap<Uuid, &str> =
        invoices.iter().map(|i| (i.id, i.number.as_str())).collect();

    let mut rows = Vec::with_capacity(invoices.len() * 3 + installments.len() + vouchers.len());
    for inv in invoices {
        rows.push(row(
            inv.date,
            inv.sequence,
            inv.id,
            RowSource::Invoice,
            &inv.number,
            format!("Sales invoice {}", inv.number),
            (inv.total_amount, Decimal::ZERO),
        ));
        if inv.plan_interest > Decimal::ZERO {
            rows.push(row(
                inv.date,
                inv.sequence,
                inv.id,
                RowSource::PlanInterest,
                &inv.number,
                format!("Installment plan interest on {}", inv.number),
                (inv.plan_interest, Decimal::ZERO),
            ));
        }
        let at_sale = (inv.amount_paid - collected.get(&inv.id).copied().unwrap_or_default())
            .max(Decimal::ZERO);
        if at_sale > Decimal::ZERO {
            rows.push(row(
                inv.date,
                inv.sequence,
                inv.id,
                RowSource::InvoicePayment,
                &inv.number,
                format!("Payment on invoice {}", inv.number),
                (Decimal::ZERO, at_sale),
            ));
        }
    }
    for inst in installments {
        let reference = numbers.get(&inst.invoice_id).copied().unwrap_or_default();
        rows.push(row(
            inst.paid_date,
            inst.sequence,
            inst.id,
            RowSource::Installment,
            reference,
            format!("Installment collected on {reference}"),
            (Decimal::ZERO, inst.amount_paid),
        ));
    }
    for v in vouchers {
        let sides = match v.voucher_type {
            VoucherType::Receipt => (Decimal::ZERO, v.amount),
            VoucherType::Payment => (v.amount, Decimal::ZERO),
        };
        let fallback = match v.voucher_type {
            VoucherType::Receipt => "Receipt",
            VoucherType::Payment => "Refund",
        };
        rows.push(row(
            v.date,
            v.sequence,
            v.id,
            RowSource::Voucher,
            &v.number,
            voucher_description(v, fallback),
            sides,
        ));
    }
    rows
}

/// Rows of a supplier statement.
///
/// - purchase invoice: credit the total, debit what was paid at purchase
/// - payment voucher: debit; receipt voucher (refund from supplier): credit
#[must_use]
pub fn supplier_rows(purchases: &[InvoiceFact], vouchers: &[VoucherFact]) -> Vec<StatementRow> {
    let mut rows = Vec::with_capacity(purchases.len() * 2 + vouchers.len());
    for inv in purchases {
        rows.push(row(
            inv.date,
            inv.sequence,
            inv.id,
            RowSource::PurchaseInvoice,
            &inv.number,
            format!("Purchase invoice {}", inv.number),
            (Decimal::ZERO, inv.total_amount),
        ));
        if inv.amount_paid > Decimal::ZERO {
            rows.push(row(
                inv.date,
                inv.sequence,
                inv.id,
                RowSource::PurchasePayment,
                &inv.number,
                format!("Payment on purchase {}", inv.number),
                (inv.amount_paid, Decimal::ZERO),
            ));
        }
    }
    for v in vouchers {
        let sides = match v.voucher_type {
            VoucherType::Payment => (v.amount, Decimal::ZERO),
            VoucherType::Receipt => (Decimal::ZERO, v.amount),
        };
        let fallback = match v.voucher_type {
            VoucherType::Payment => "Payment",
            VoucherType::Receipt => "Refund",
        };
        rows.push(row(
            v.date,
            v.sequence,
            v.id,
            RowSource::Voucher,
            &v.number,
            voucher_description(v, fallback),
            sides,
        ));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NormalSide;
    use crate::statement::{DateRange, OpeningBalancePolicy, StatementService, StatementSubject};
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn invoice(total: Decimal, paid: Decimal) -> InvoiceFact {
        InvoiceFact {
            id: Uuid::now_v7(),
            date: date(1),
            sequence: 1,
            number: "INV-1".into(),
            total_amount: total,
            amount_paid: paid,
            plan_interest: Decimal::ZERO,
        }
    }

    fn voucher(voucher_type: VoucherType, amount: Decimal) -> VoucherFact {
        VoucherFact {
            id: Uuid::now_v7(),
            date: date(5),
            sequence: 2,
            number: "RV-000001".into(),
            voucher_type,
            amount,
            description: None,
        }
    }

    fn fold(rows: Vec<StatementRow>, side: NormalSide, opening: Decimal) -> Decimal {
        StatementService::build(
            StatementSubject::Party {
                party_type: crate::chart::PartyType::Customer,
                party_id: Uuid::nil(),
            },
            side,
            opening,
            OpeningBalancePolicy::Stored,
            DateRange::default(),
            rows,
        )
        .net_balance
    }

    #[test]
    fn test_customer_receipt_reduces_balance() {
        let before = fold(
            customer_rows(&[invoice(dec!(800), Decimal::ZERO)], &[], &[]),
            NormalSide::Debit,
            Decimal::ZERO,
        );
        let after = fold(
            customer_rows(
                &[invoice(dec!(800), Decimal::ZERO)],
                &[],
                &[voucher(VoucherType::Receipt, dec!(500))],
            ),
            NormalSide::Debit,
            Decimal::ZERO,
        );
        assert_eq!(before, dec!(800));
        assert_eq!(after, before - dec!(500));
    }

    #[test]
    fn test_installments_not_double_counted() {
        let inv = invoice(dec!(1200), dec!(300));
        let inst = InstallmentFact {
            id: Uuid::now_v7(),
            invoice_id: inv.id,
            paid_date: date(10),
            sequence: 3,
            amount_paid: dec!(100),
            principal_paid: dec!(100),
        };
        let rows = customer_rows(&[inv], &[inst], &[]);
        // invoice, 200 settled at sale, 100 installment
        assert_eq!(rows.len(), 3);
        assert_eq!(fold(rows, NormalSide::Debit, Decimal::ZERO), dec!(900));
    }

    #[test]
    fn test_plan_interest_is_owed_then_collected() {
        let mut inv = invoice(dec!(1000), dec!(1000));
        inv.plan_interest = dec!(100);
        let collected: Vec<InstallmentFact> = (0..2)
            .map(|i| InstallmentFact {
                id: Uuid::now_v7(),
                invoice_id: inv.id,
                paid_date: date(10 + i),
                sequence: 10 + i64::from(i),
                amount_paid: dec!(550),
                principal_paid: dec!(500),
            })
            .collect();

        let rows = customer_rows(&[inv.clone()], &collected, &[]);
        // invoice, interest, two installments; nothing was settled at sale
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().any(|r| r.source == RowSource::PlanInterest && r.debit == dec!(100)));
        assert_eq!(fold(rows, NormalSide::Debit, Decimal::ZERO), Decimal::ZERO);

        let unpaid = customer_rows(&[InvoiceFact { amount_paid: Decimal::ZERO, ..inv }], &[], &[]);
        assert_eq!(fold(unpaid, NormalSide::Debit, Decimal::ZERO), dec!(1100));
    }

    #[test]
    fn test_supplier_rows() {
        let rows = supplier_rows(
            &[invoice(dec!(1000), dec!(400))],
            &[voucher(VoucherType::Payment, dec!(250))],
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(fold(rows, NormalSide::Credit, dec!(100)), dec!(450));
    }

    #[test]
    fn test_voucher_description_fallback() {
        let mut v = voucher(VoucherType::Receipt, dec!(1));
        assert_eq!(voucher_description(&v, "Receipt"), "Receipt RV-000001");
        v.description = Some(" cash on delivery ".into());
        assert_eq!(voucher_description(&v, "Receipt"), "cash on delivery");
    }
}
