//! Installment plans and collection.

mod common;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use tallybook_core::chart::{AccountRole, PartyType};
use tallybook_core::installment::InstallmentStatus;
use tallybook_core::invoice::{PaymentMethod, PaymentStatus};
use tallybook_core::statement::{DateRange, OpeningBalancePolicy, RowSource, StatementSubject};
use tallybook_db::{
    AccountRepository, CreatePlanInput, InstallmentFilter, InstallmentRepository,
    InvoiceRepository, PartyRepository, RecordSaleInput, StatementRepository,
};
use tallybook_shared::ErrorKind;

use common::{date, setup_db, setup_tenant};

async fn credit_sale(db: &sea_orm::DatabaseConnection, tenant: Uuid, total: Decimal) -> Uuid {
    let customer = PartyRepository::new(db.clone())
        .create_customer(tenant, "Nour Trading", Decimal::ZERO)
        .await
        .unwrap();
    InvoiceRepository::new(db.clone())
        .record_sale(
            tenant,
            RecordSaleInput {
                customer_id: Some(customer.id),
                invoice_number: "INV-2001".to_string(),
                issue_date: date(2026, 1, 10),
                total_amount: total,
                amount_paid: Decimal::ZERO,
                payment_method: PaymentMethod::Other,
                shift_id: None,
            },
        )
        .await
        .unwrap()
        .id
}

fn plan(invoice_id: Uuid, count: u32) -> CreatePlanInput {
    CreatePlanInput {
        invoice_id,
        down_payment: Decimal::ZERO,
        count,
        interest_percent: Decimal::ZERO,
        start_date: date(2026, 2, 1),
    }
}

#[tokio::test]
async fn test_plan_splits_invoice_evenly() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(1200)).await;

    let rows = InstallmentRepository::new(db.clone())
        .create_plan(tenant, plan(invoice_id, 12))
        .await
        .unwrap();

    assert_eq!(rows.len(), 12);
    assert!(rows.iter().all(|r| r.amount == dec!(100)));
    assert_eq!(rows[0].due_date, date(2026, 2, 1));
    assert_eq!(rows[11].due_date, date(2027, 1, 1));
    assert!(
        rows.iter()
            .all(|r| InstallmentStatus::from(r.status) == InstallmentStatus::Pending)
    );
}

#[tokio::test]
async fn test_second_plan_rejected() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(600)).await;
    let repo = InstallmentRepository::new(db.clone());

    repo.create_plan(tenant, plan(invoice_id, 3)).await.unwrap();
    let err = repo.create_plan(tenant, plan(invoice_id, 6)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_pay_installment_once() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(1200)).await;
    let repo = InstallmentRepository::new(db.clone());
    let rows = repo.create_plan(tenant, plan(invoice_id, 12)).await.unwrap();

    let collected = repo
        .pay_installment(tenant, rows[0].id, date(2026, 2, 3))
        .await
        .unwrap();
    assert_eq!(
        InstallmentStatus::from(collected.installment.status),
        InstallmentStatus::Paid
    );
    assert_eq!(collected.installment.amount_paid, dec!(100));
    assert_eq!(collected.invoice.amount_paid, dec!(100));
    assert_eq!(
        PaymentStatus::from(collected.invoice.payment_status),
        PaymentStatus::Partial
    );
    assert_eq!(collected.entry.total_debit(), dec!(100));
    assert_eq!(collected.entry.entry.reference.as_deref(), Some("INV-2001"));

    let err = repo
        .pay_installment(tenant, rows[0].id, date(2026, 2, 4))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let invoice = InvoiceRepository::new(db.clone())
        .find_invoice(tenant, invoice_id)
        .await
        .unwrap();
    assert_eq!(invoice.amount_paid, dec!(100));
}

#[tokio::test]
async fn test_overdue_listing() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(300)).await;
    let repo = InstallmentRepository::new(db.clone());
    let rows = repo.create_plan(tenant, plan(invoice_id, 3)).await.unwrap();
    repo.pay_installment(tenant, rows[0].id, date(2026, 2, 1))
        .await
        .unwrap();

    let today = date(2026, 3, 15);
    let all = repo
        .list_installments(tenant, InstallmentFilter::default(), today)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(!all[0].overdue);
    assert!(all[1].overdue);
    assert!(!all[2].overdue);

    let overdue = repo
        .list_installments(
            tenant,
            InstallmentFilter {
                overdue_only: true,
                ..InstallmentFilter::default()
            },
            today,
        )
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].installment.id, rows[1].id);
}

#[tokio::test]
async fn test_unknown_installment_not_found() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;

    let err = InstallmentRepository::new(db.clone())
        .pay_installment(tenant, Uuid::now_v7(), date(2026, 2, 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_concurrent_collectors_one_wins() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(400)).await;
    let repo = InstallmentRepository::new(db.clone());
    let rows = repo.create_plan(tenant, plan(invoice_id, 4)).await.unwrap();
    let target = rows[0].id;

    let attempts = (0..4).map(|_| repo.pay_installment(tenant, target, date(2026, 2, 1)));
    let results = join_all(attempts).await;

    let won = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(won, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind() == ErrorKind::Conflict)
    );

    let invoice = InvoiceRepository::new(db.clone())
        .find_invoice(tenant, invoice_id)
        .await
        .unwrap();
    assert_eq!(invoice.amount_paid, dec!(100));
}

#[tokio::test]
async fn test_interest_plan_settles_invoice_and_statement() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(1000)).await;
    let repo = InstallmentRepository::new(db.clone());

    let rows = repo
        .create_plan(
            tenant,
            CreatePlanInput {
                interest_percent: dec!(10),
                ..plan(invoice_id, 2)
            },
        )
        .await
        .unwrap();
    assert!(rows.iter().all(|r| r.amount == dec!(550) && r.principal == dec!(500)));

    let first = repo
        .pay_installment(tenant, rows[0].id, date(2026, 2, 1))
        .await
        .unwrap();
    assert_eq!(first.entry.total_debit(), dec!(550));
    assert_eq!(first.invoice.amount_paid, dec!(500));
    let second = repo
        .pay_installment(tenant, rows[1].id, date(2026, 3, 1))
        .await
        .unwrap();
    assert_eq!(second.invoice.amount_paid, dec!(1000));
    assert_eq!(
        PaymentStatus::from(second.invoice.payment_status),
        PaymentStatus::Paid
    );

    let customer_id = second.invoice.customer_id.unwrap();
    let statements = StatementRepository::new(db.clone());
    let statement = statements
        .get_statement(
            tenant,
            StatementSubject::Party {
                party_type: PartyType::Customer,
                party_id: customer_id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();
    assert_eq!(statement.total_debit, dec!(1100));
    assert_eq!(statement.total_credit, dec!(1100));
    assert_eq!(statement.net_balance, Decimal::ZERO);
    assert!(
        statement
            .lines
            .iter()
            .any(|l| l.source == RowSource::PlanInterest && l.debit == dec!(100))
    );

    // Interest is earned when the plan is agreed.
    let revenue = AccountRepository::new(db.clone())
        .resolve_or_create_role_account(tenant, AccountRole::Revenue)
        .await
        .unwrap();
    let earned = statements
        .get_statement(
            tenant,
            StatementSubject::Account {
                account_id: revenue.id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();
    assert_eq!(earned.net_balance, dec!(100));
}

#[tokio::test]
async fn test_plan_without_interest_posts_nothing_up_front() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(900)).await;

    InstallmentRepository::new(db.clone())
        .create_plan(tenant, plan(invoice_id, 3))
        .await
        .unwrap();

    let revenue = AccountRepository::new(db.clone())
        .resolve_or_create_role_account(tenant, AccountRole::Revenue)
        .await
        .unwrap();
    let statement = StatementRepository::new(db.clone())
        .get_statement(
            tenant,
            StatementSubject::Account {
                account_id: revenue.id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();
    assert!(statement.lines.is_empty());
}

#[tokio::test]
async fn test_oversized_plan_rejected() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let invoice_id = credit_sale(&db, tenant, dec!(1000000)).await;

    let err = InstallmentRepository::new(db.clone())
        .create_plan(tenant, plan(invoice_id, 4_000_000))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
