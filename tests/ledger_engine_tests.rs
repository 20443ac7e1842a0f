mod common;

use common::{setup_test_env, setup_with_users};
use finance_ledger::{
    core::services::{LedgerService, ReportService},
    currency::LocaleConfig,
    domain::{TransactionKind, TRANSFER_IN_CATEGORY, TRANSFER_OUT_CATEGORY},
    errors::LedgerError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn net_total_matches_signed_sum_of_postings() {
    let (mut store, _, _) = setup_test_env();
    LedgerService::create_category(&mut store, "alice", "food").unwrap();
    let postings = [
        (TransactionKind::Income, dec!(1200.00), "salary"),
        (TransactionKind::Expense, dec!(35.40), "food"),
        (TransactionKind::Income, dec!(0.01), "gift"),
        (TransactionKind::Expense, dec!(99.99), "food"),
        (TransactionKind::Expense, dec!(10), "gift"),
    ];
    for (kind, amount, category) in postings {
        LedgerService::add_transaction(&mut store, "alice", kind, amount, category, "").unwrap();
    }

    let wallet = store.get_or_load("alice");
    let expected: Decimal = wallet
        .transactions()
        .iter()
        .map(|txn| txn.signed_amount())
        .sum();
    let totals = ReportService::totals(wallet);
    assert_eq!(totals.income - totals.expense, expected);
    assert_eq!(totals.net(), dec!(1054.62));
}

#[test]
fn non_positive_amounts_are_rejected_without_side_effects() {
    let (mut store, _, _) = setup_test_env();
    for amount in [Decimal::ZERO, dec!(-5)] {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            let result =
                LedgerService::add_transaction(&mut store, "alice", kind, amount, "salary", "");
            assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
        }
    }
    let wallet = store.get_or_load("alice");
    assert!(wallet.transactions().is_empty());
    assert!(wallet.categories().is_empty());
}

#[test]
fn expense_requires_known_category_but_income_creates_it() {
    let (mut store, _, _) = setup_test_env();
    assert_eq!(
        LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Expense,
            dec!(10),
            "books",
            ""
        ),
        Err(LedgerError::CategoryNotFound("books".into()))
    );

    LedgerService::add_transaction(
        &mut store,
        "alice",
        TransactionKind::Income,
        dec!(10),
        "books",
        "resale",
    )
    .unwrap();
    assert_eq!(
        store
            .get_or_load("alice")
            .category("books")
            .unwrap()
            .budget(),
        Decimal::ZERO
    );

    LedgerService::add_transaction(
        &mut store,
        "alice",
        TransactionKind::Expense,
        dec!(10),
        "books",
        "",
    )
    .unwrap();
    assert_eq!(store.get_or_load("alice").transactions().len(), 2);
}

#[test]
fn transfer_posts_one_entry_on_each_side() {
    let (mut store, directory, _) = setup_with_users(&["alice", "bob"]);
    LedgerService::transfer(&mut store, &directory, "alice", "bob", dec!(100), "rent").unwrap();

    let sender = store.get_or_load("alice");
    assert_eq!(sender.transactions().len(), 1);
    let sent = &sender.transactions()[0];
    assert_eq!(sent.kind, TransactionKind::Expense);
    assert_eq!(sent.amount, dec!(100));
    assert_eq!(sent.category, TRANSFER_OUT_CATEGORY);
    assert!(sender.has_category(TRANSFER_OUT_CATEGORY));

    let recipient = store.get_or_load("bob");
    assert_eq!(recipient.transactions().len(), 1);
    let received = &recipient.transactions()[0];
    assert_eq!(received.kind, TransactionKind::Income);
    assert_eq!(received.amount, dec!(100));
    assert_eq!(received.category, TRANSFER_IN_CATEGORY);

    LedgerService::transfer(&mut store, &directory, "alice", "bob", dec!(100), "rent").unwrap();
    assert_eq!(store.get_or_load("alice").transactions().len(), 2);
    assert_eq!(store.get_or_load("bob").transactions().len(), 2);
}

#[test]
fn self_transfer_always_fails() {
    let (mut store, directory, _) = setup_with_users(&["alice"]);
    assert_eq!(
        LedgerService::transfer(&mut store, &directory, "alice", "alice", dec!(10), ""),
        Err(LedgerError::SelfTransfer)
    );
    assert!(store.get_or_load("alice").transactions().is_empty());
}

#[test]
fn transfer_to_unregistered_login_fails() {
    let (mut store, directory, _) = setup_with_users(&["alice"]);
    // a cached wallet does not make a login known
    store.get_or_load("mallory");
    assert_eq!(
        LedgerService::transfer(&mut store, &directory, "alice", "mallory", dec!(10), ""),
        Err(LedgerError::UnknownRecipient("mallory".into()))
    );
}

#[test]
fn budget_is_clamped_and_reported() {
    let (mut store, _, _) = setup_test_env();
    LedgerService::set_budget(&mut store, "alice", "food", dec!(0)).unwrap();
    LedgerService::set_budget(&mut store, "alice", "food", dec!(250.5)).unwrap();
    let lines = ReportService::budget_lines(store.get_or_load("alice"));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].budget, dec!(250.5));
    assert_eq!(lines[0].remaining, dec!(250.5));
}

#[test]
fn posting_past_decimal_max_is_refused() {
    let (mut store, _, _) = setup_test_env();
    LedgerService::create_category(&mut store, "alice", "food").unwrap();
    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        LedgerService::add_transaction(&mut store, "alice", kind, Decimal::MAX, "food", "")
            .unwrap();
        assert!(matches!(
            LedgerService::add_transaction(&mut store, "alice", kind, Decimal::MAX, "food", ""),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    let wallet = store.get_or_load("alice");
    assert_eq!(wallet.transactions().len(), 2);
    let totals = ReportService::totals(wallet);
    assert_eq!(totals.net(), Decimal::ZERO);
    let summary = ReportService::build_summary(&mut store, "alice", &LocaleConfig::default());
    assert!(summary.contains("=== Summary for alice ==="));
}
