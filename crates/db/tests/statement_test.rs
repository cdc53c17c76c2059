//! Vouchers and statements: party sub-ledgers and account windows.

mod common;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tallybook_core::chart::{AccountRole, AccountType, PartyType};
use tallybook_core::invoice::PaymentMethod;
use tallybook_core::ledger::{CreateJournalEntryInput, JournalLineInput, VoucherType};
use tallybook_core::statement::{DateRange, OpeningBalancePolicy, RowSource, StatementSubject};
use tallybook_db::{
    AccountFilter, AccountRepository, CreateAccountInput, InvoiceRepository, JournalRepository,
    PartyRepository, PostVoucherInput, RecordPurchaseInput, RecordSaleInput, StatementRepository,
    VoucherRepository,
};
use tallybook_shared::ErrorKind;

use common::{date, setup_db, setup_tenant};

#[tokio::test]
async fn test_receipt_voucher_reduces_customer_balance() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let customer = PartyRepository::new(db.clone())
        .create_customer(tenant, "Walid Stores", Decimal::ZERO)
        .await
        .unwrap();
    InvoiceRepository::new(db.clone())
        .record_sale(
            tenant,
            RecordSaleInput {
                customer_id: Some(customer.id),
                invoice_number: "INV-1001".to_string(),
                issue_date: date(2026, 2, 1),
                total_amount: dec!(1000),
                amount_paid: Decimal::ZERO,
                payment_method: PaymentMethod::Other,
                shift_id: None,
            },
        )
        .await
        .unwrap();

    let posted = VoucherRepository::new(db.clone())
        .post_voucher(
            tenant,
            PostVoucherInput::for_party(
                VoucherType::Receipt,
                dec!(500),
                date(2026, 2, 10),
                PartyType::Customer,
                customer.id,
            ),
        )
        .await
        .unwrap();
    assert_eq!(posted.voucher.voucher_number, "RV-000001");
    assert_eq!(posted.entry.lines.len(), 2);
    assert_eq!(posted.entry.total_debit(), dec!(500));
    assert_eq!(posted.entry.total_credit(), dec!(500));

    let cash = AccountRepository::new(db.clone())
        .resolve_or_create_role_account(tenant, AccountRole::Cash)
        .await
        .unwrap();
    let cash_line = posted
        .entry
        .lines
        .iter()
        .find(|l| l.account_id == cash.id)
        .unwrap();
    assert_eq!(cash_line.debit, dec!(500));

    let statement = StatementRepository::new(db.clone())
        .get_statement(
            tenant,
            StatementSubject::Party {
                party_type: PartyType::Customer,
                party_id: customer.id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();
    assert_eq!(statement.lines.len(), 2);
    assert_eq!(statement.lines[0].source, RowSource::Invoice);
    assert_eq!(statement.lines[0].balance, dec!(1000));
    assert_eq!(statement.lines[1].source, RowSource::Voucher);
    assert_eq!(statement.net_balance, dec!(500));
}

#[tokio::test]
async fn test_voucher_books_to_party_subledger() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let customer = PartyRepository::new(db.clone())
        .create_customer(tenant, "Walid Stores", Decimal::ZERO)
        .await
        .unwrap();
    let vouchers = VoucherRepository::new(db.clone());

    let first = vouchers
        .post_voucher(
            tenant,
            PostVoucherInput::for_party(
                VoucherType::Receipt,
                dec!(20),
                date(2026, 2, 10),
                PartyType::Customer,
                customer.id,
            ),
        )
        .await
        .unwrap();
    let second = vouchers
        .post_voucher(
            tenant,
            PostVoucherInput::for_party(
                VoucherType::Receipt,
                dec!(30),
                date(2026, 2, 11),
                PartyType::Customer,
                customer.id,
            ),
        )
        .await
        .unwrap();

    // One sub-ledger account per customer, reused by later vouchers.
    assert_eq!(first.voucher.account_id, second.voucher.account_id);
    let subledger = first.voucher.account_id.unwrap();
    let ar = AccountRepository::new(db.clone())
        .resolve_or_create_role_account(tenant, AccountRole::AccountsReceivable)
        .await
        .unwrap();
    let account = AccountRepository::new(db.clone())
        .find_account(tenant, subledger)
        .await
        .unwrap();
    assert_eq!(account.parent_id, Some(ar.id));
    assert!(account.name.contains("Walid Stores"));

    let statement = StatementRepository::new(db.clone())
        .get_statement(
            tenant,
            StatementSubject::Account {
                account_id: subledger,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();
    assert_eq!(statement.total_credit, dec!(50));
    assert_eq!(statement.net_balance, dec!(-50));
}

#[tokio::test]
async fn test_account_statement_opening_plus_credit() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let accounts = AccountRepository::new(db.clone());
    let mut loan = CreateAccountInput::new("2201", "Bank loan", AccountType::Liability);
    loan.opening_balance = dec!(1000);
    let loan = accounts.create_account(tenant, loan).await.unwrap();
    let cash = accounts
        .resolve_or_create_role_account(tenant, AccountRole::Cash)
        .await
        .unwrap();
    JournalRepository::new(db.clone())
        .create_journal_entry(
            tenant,
            CreateJournalEntryInput::posted(
                date(2026, 6, 15),
                "Loan top-up",
                vec![
                    JournalLineInput::debit(cash.id, dec!(200)),
                    JournalLineInput::credit(loan.id, dec!(200)),
                ],
            ),
        )
        .await
        .unwrap();

    let statement = StatementRepository::new(db.clone())
        .get_statement(
            tenant,
            StatementSubject::Account { account_id: loan.id },
            DateRange::new(Some(date(2026, 6, 1)), Some(date(2026, 6, 30))).unwrap(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();

    assert_eq!(statement.opening_balance, dec!(1000));
    assert_eq!(statement.total_credit, dec!(200));
    assert_eq!(statement.net_balance, dec!(1200));
    assert_eq!(statement.lines[0].reference.as_deref(), Some("JE-000001"));
}

#[tokio::test]
async fn test_supplier_statement_from_purchases_and_payments() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let supplier = PartyRepository::new(db.clone())
        .create_supplier(tenant, "Delta Wholesale", dec!(100))
        .await
        .unwrap();
    InvoiceRepository::new(db.clone())
        .record_purchase(
            tenant,
            RecordPurchaseInput {
                supplier_id: supplier.id,
                invoice_number: "P-77".to_string(),
                issue_date: date(2026, 3, 1),
                total_amount: dec!(800),
                amount_paid: dec!(300),
            },
        )
        .await
        .unwrap();
    VoucherRepository::new(db.clone())
        .post_voucher(
            tenant,
            PostVoucherInput::for_party(
                VoucherType::Payment,
                dec!(200),
                date(2026, 3, 20),
                PartyType::Supplier,
                supplier.id,
            ),
        )
        .await
        .unwrap();

    let statement = StatementRepository::new(db.clone())
        .get_statement(
            tenant,
            StatementSubject::Party {
                party_type: PartyType::Supplier,
                party_id: supplier.id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();

    // 100 opening + 800 purchased - 300 paid at purchase - 200 voucher
    assert_eq!(statement.net_balance, dec!(400));
    assert_eq!(statement.lines.len(), 3);
}

#[tokio::test]
async fn test_statement_rejects_bad_subjects() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let other = setup_tenant(&db, "Globex").await;
    let customer = PartyRepository::new(db.clone())
        .create_customer(tenant, "Walid Stores", Decimal::ZERO)
        .await
        .unwrap();
    let statements = StatementRepository::new(db.clone());

    let err = statements
        .get_statement(
            other,
            StatementSubject::Party {
                party_type: PartyType::Customer,
                party_id: customer.id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = statements
        .get_statement(
            tenant,
            StatementSubject::Party {
                party_type: PartyType::Other,
                party_id: customer.id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let backwards = DateRange {
        from: Some(date(2026, 5, 1)),
        to: Some(date(2026, 4, 1)),
    };
    let err = statements
        .get_statement(
            tenant,
            StatementSubject::Party {
                party_type: PartyType::Customer,
                party_id: customer.id,
            },
            backwards,
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_concurrent_first_vouchers_share_role_accounts() {
    let db = setup_db().await;
    let tenant = setup_tenant(&db, "Acme").await;
    let parties = PartyRepository::new(db.clone());
    let mut customers = Vec::new();
    for name in ["Amal", "Basma", "Chadi"] {
        customers.push(
            parties
                .create_customer(tenant, name, Decimal::ZERO)
                .await
                .unwrap()
                .id,
        );
    }
    let vouchers = VoucherRepository::new(db.clone());

    // Two receipts per customer: role and sub-ledger accounts are bootstrapped concurrently.
    let attempts = customers.iter().chain(customers.iter()).map(|customer| {
        vouchers.post_voucher(
            tenant,
            PostVoucherInput::for_party(
                VoucherType::Receipt,
                dec!(10),
                date(2026, 4, 1),
                PartyType::Customer,
                *customer,
            ),
        )
    });
    let results = join_all(attempts).await;
    assert!(results.iter().all(Result::is_ok));

    let accounts = AccountRepository::new(db.clone())
        .list_accounts(tenant, AccountFilter::default())
        .await
        .unwrap();
    let cash = AccountRepository::new(db.clone())
        .resolve_or_create_role_account(tenant, AccountRole::Cash)
        .await
        .unwrap();
    let receivable = AccountRepository::new(db.clone())
        .resolve_or_create_role_account(tenant, AccountRole::AccountsReceivable)
        .await
        .unwrap();
    // cash, receivables and one sub-ledger account per customer
    assert_eq!(accounts.len(), 5);
    assert_eq!(
        accounts
            .iter()
            .filter(|a| a.parent_id == Some(receivable.id))
            .count(),
        3
    );

    let cash_statement = StatementRepository::new(db.clone())
        .get_statement(
            tenant,
            StatementSubject::Account {
                account_id: cash.id,
            },
            DateRange::default(),
            OpeningBalancePolicy::Stored,
        )
        .await
        .unwrap();
    assert_eq!(cash_statement.lines.len(), 6);
    assert_eq!(cash_statement.net_balance, dec!(60));
}
