use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fintrack_core::core::{summarize, Period, Tracker};
use fintrack_core::domain::{BillingCycle, Subscription, Transaction, TransactionKind};
use fintrack_core::storage::MemoryStore;
use rust_decimal::Decimal;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn txn(kind: TransactionKind, amount: &str, category: &str, date: DateTime<Utc>) -> Transaction {
    Transaction::new(kind, amount.parse::<Decimal>().unwrap(), category, "", date)
        .expect("valid transaction")
}

fn sub(name: &str, amount: &str, category: &str) -> Subscription {
    Subscription::new(
        name,
        amount.parse::<Decimal>().unwrap(),
        BillingCycle::Monthly,
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        category,
        "",
        at(2024, 1, 1, 8),
    )
    .expect("valid subscription")
}

#[test]
fn balance_is_income_minus_expenses_minus_subscriptions() {
    let now = at(2024, 6, 15, 12);
    let transactions = vec![
        txn(TransactionKind::Income, "3000", "Salary", at(2024, 6, 1, 9)),
        txn(TransactionKind::Expense, "850.25", "Housing", at(2024, 6, 2, 9)),
        txn(TransactionKind::Expense, "149.75", "Food", at(2024, 6, 10, 9)),
    ];
    let subscriptions = vec![sub("Netflix", "15.99", ""), sub("Gym", "34.01", "Health")];

    let summary = summarize(&transactions, &subscriptions, Period::Month, now);

    assert_eq!(summary.totals.total_income, Decimal::from(3000));
    assert_eq!(summary.totals.total_expense, Decimal::from(1000));
    assert_eq!(summary.totals.total_subscription_cost, Decimal::from(50));
    assert_eq!(
        summary.balance(),
        summary.totals.total_income
            - summary.totals.total_expense
            - summary.totals.total_subscription_cost
    );
    assert_eq!(summary.totals.combined_expense(), Decimal::from(1050));
}

#[test]
fn summarizing_twice_gives_identical_results() {
    let now = at(2024, 6, 15, 12);
    let transactions = vec![
        txn(TransactionKind::Income, "100", "", at(2024, 6, 1, 9)),
        txn(TransactionKind::Expense, "40", "Food", at(2024, 6, 2, 9)),
    ];
    let subscriptions = vec![sub("Music", "9.99", "")];

    let first = summarize(&transactions, &subscriptions, Period::Month, now);
    let second = summarize(&transactions, &subscriptions, Period::Month, now);

    assert_eq!(first.totals, second.totals);
    assert_eq!(first.category_breakdown, second.category_breakdown);
}

#[test]
fn week_window_crosses_month_and_year_boundaries() {
    let now = at(2024, 1, 3, 12);
    // The window opens at 2023-12-27 12:00, inclusive.
    let transactions = vec![
        txn(TransactionKind::Expense, "10", "Inside", at(2023, 12, 28, 12)),
        txn(TransactionKind::Expense, "5", "Cutoff", at(2023, 12, 27, 12)),
        txn(TransactionKind::Expense, "20", "Outside", at(2023, 12, 27, 11)),
    ];

    let summary = summarize(&transactions, &[], Period::Week, now);

    assert_eq!(summary.totals.total_expense, Decimal::from(15));
    let labels: Vec<&str> = summary
        .category_breakdown
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Inside", "Cutoff"]);
}

#[test]
fn subscriptions_count_in_every_window_but_old_expenses_drop_out() {
    let now = at(2024, 6, 15, 12);
    let transactions = vec![
        txn(TransactionKind::Expense, "500", "OldRent", at(2023, 1, 5, 9)),
        txn(TransactionKind::Expense, "60", "Food", at(2024, 6, 10, 9)),
    ];
    let subscriptions = vec![sub("Netflix", "15", "")];

    let summary = summarize(&transactions, &subscriptions, Period::Week, now);

    assert_eq!(summary.totals.total_expense, Decimal::from(60));
    assert_eq!(summary.totals.total_subscription_cost, Decimal::from(15));
    assert_eq!(
        summary.breakdown_total(),
        summary.totals.total_expense + summary.totals.total_subscription_cost,
        "breakdown covers filtered expenses plus all subscriptions"
    );
    assert!(summary
        .category_breakdown
        .iter()
        .all(|entry| entry.label != "OldRent"));
}

#[test]
fn deleting_the_last_records_zeroes_the_summary() {
    let mut tracker = Tracker::open(Box::new(MemoryStore::new()));
    let now = at(2024, 6, 15, 12);
    let txn_id = tracker
        .add_transaction(txn(TransactionKind::Expense, "60", "Food", at(2024, 6, 10, 9)))
        .unwrap();
    let sub_id = tracker.add_subscription(sub("Netflix", "15", "")).unwrap();

    assert!(tracker.remove_transaction(txn_id).unwrap());
    assert!(tracker.remove_subscription(sub_id).unwrap());

    let summary = tracker.summarize(Period::Month, now);
    assert_eq!(summary.totals.total_income, Decimal::ZERO);
    assert_eq!(summary.totals.total_expense, Decimal::ZERO);
    assert_eq!(summary.totals.total_subscription_cost, Decimal::ZERO);
    assert!(summary.category_breakdown.is_empty());
    assert!(summary.breakdown_slices().is_empty());
}

#[test]
fn overall_totals_ignore_the_window() {
    let mut tracker = Tracker::open(Box::new(MemoryStore::new()));
    let now = at(2024, 6, 15, 12);
    tracker
        .add_transaction(txn(TransactionKind::Income, "5000", "Bonus", at(2022, 3, 1, 9)))
        .unwrap();
    tracker
        .add_transaction(txn(TransactionKind::Expense, "80", "Food", at(2024, 6, 10, 9)))
        .unwrap();

    let windowed = tracker.summarize(Period::Month, now);
    let overall = tracker.overall_totals();

    assert_eq!(windowed.totals.total_income, Decimal::ZERO);
    assert_eq!(overall.total_income, Decimal::from(5000));
    assert_eq!(overall.total_expense, Decimal::from(80));
}
