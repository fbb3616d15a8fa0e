use chrono::NaiveDate;
use proptest::prelude::*;

use crate::accounts::{Account, AccountKind};
use crate::constants::MAX_OCCURRENCES_PER_RULE;
use crate::errors::{Error, ValidationError};
use crate::goals::Goal;
use crate::ledger::account_balance;
use crate::recurring::{execute_now, expand_due, Frequency, RecurringKind, RecurringRule};
use crate::snapshot::Snapshot;
use crate::transactions::{Transaction, TransactionKind};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn account(id: &str, name: &str, kind: AccountKind) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        currency: "EUR".to_string(),
        colour: String::new(),
        shared_balance: false,
    }
}

fn income_txn(id: &str, amount: f64, account_id: &str, on: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount,
        date: date(on),
        category: None,
        category_id: None,
        note: None,
        recurring_id: None,
        kind: TransactionKind::Income {
            account_id: account_id.to_string(),
            method_id: None,
            source: None,
        },
    }
}

fn monthly_rule(id: &str, amount: f64, day: u32, anchor: &str, kind: RecurringKind) -> RecurringRule {
    RecurringRule {
        id: id.to_string(),
        amount,
        frequency: Frequency::Monthly,
        day,
        start_date: Some(date(anchor)),
        last_applied: None,
        category: None,
        category_id: None,
        note: None,
        kind,
    }
}

fn income_kind(account_id: &str) -> RecurringKind {
    RecurringKind::Income {
        account_id: account_id.to_string(),
        method_id: None,
        source: None,
    }
}

fn expense_kind(account_id: &str) -> RecurringKind {
    RecurringKind::Expense {
        account_id: account_id.to_string(),
        method_id: None,
    }
}

fn fixture() -> Snapshot {
    let mut snapshot = Snapshot::default();
    snapshot.accounts = vec![
        account("acc_bank", "Main Bank", AccountKind::Bank),
        account("acc_piggy", "Piggy", AccountKind::Piggy),
    ];
    snapshot
}

#[test]
fn test_income_rule_materializes_every_due_occurrence() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![monthly_rule(
        "r1",
        1000.0,
        1,
        "2025-01-01",
        income_kind("acc_bank"),
    )];

    let expansion = expand_due(&snapshot, date("2025-04-15"));
    let dates: Vec<NaiveDate> = expansion.new_transactions.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![date("2025-02-01"), date("2025-03-01"), date("2025-04-01")]
    );
    assert!(expansion
        .new_transactions
        .iter()
        .all(|t| t.recurring_id.as_deref() == Some("r1")));
    assert_eq!(
        expansion.updated_rules[0].last_applied,
        Some(date("2025-04-01"))
    );
}

#[test]
fn test_monthly_day_clamps_and_restores() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![monthly_rule(
        "r1",
        10.0,
        31,
        "2025-01-31",
        income_kind("acc_bank"),
    )];
    snapshot.recurring_rules[0].last_applied = Some(date("2025-01-31"));

    let expansion = expand_due(&snapshot, date("2025-04-30"));
    let dates: Vec<NaiveDate> = expansion.new_transactions.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![date("2025-02-28"), date("2025-03-31"), date("2025-04-30")]
    );
}

#[test]
fn test_expense_rule_stalls_until_funds_arrive() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![monthly_rule(
        "r1",
        100.0,
        5,
        "2025-01-05",
        expense_kind("acc_bank"),
    )];

    // No funds at all: the rule stalls at its anchor and generates nothing.
    let expansion = expand_due(&snapshot, date("2025-03-31"));
    assert!(expansion.is_empty());

    // Funding one occurrence lets exactly one through; the cursor advances
    // with it and the rule stalls again.
    snapshot.transactions = vec![income_txn("t1", 150.0, "acc_bank", "2025-01-02")];
    let expansion = expand_due(&snapshot, date("2025-03-31"));
    assert_eq!(expansion.new_transactions.len(), 1);
    assert_eq!(expansion.new_transactions[0].date, date("2025-02-05"));
    assert_eq!(
        expansion.updated_rules[0].last_applied,
        Some(date("2025-02-05"))
    );
}

#[test]
fn test_income_rule_funds_expense_rule_in_same_pass() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![
        monthly_rule("r_salary", 1000.0, 1, "2025-01-01", income_kind("acc_bank")),
        monthly_rule("r_rent", 600.0, 2, "2025-01-02", expense_kind("acc_bank")),
    ];

    let expansion = expand_due(&snapshot, date("2025-02-10"));
    assert_eq!(expansion.new_transactions.len(), 2);
    let snapshot = expansion.apply(snapshot);
    assert_eq!(account_balance(&snapshot.transactions, "acc_bank"), 400.0);
}

#[test]
fn test_expansion_is_idempotent_once_applied() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![monthly_rule(
        "r1",
        1000.0,
        1,
        "2025-01-01",
        income_kind("acc_bank"),
    )];
    let today = date("2025-06-15");

    let first = expand_due(&snapshot, today);
    assert_eq!(first.new_transactions.len(), 5);
    let snapshot = first.apply(snapshot);

    let second = expand_due(&snapshot, today);
    assert!(second.is_empty());
}

#[test]
fn test_goal_transfer_waits_for_destination_capacity() {
    let mut snapshot = fixture();
    snapshot.goals = vec![Goal {
        id: "g1".to_string(),
        name: "Trip".to_string(),
        colour: String::new(),
        account_id: "acc_piggy".to_string(),
        target: 500.0,
        current: 0.0,
        start_date: None,
        target_date: None,
    }];
    snapshot.recurring_rules = vec![monthly_rule(
        "r1",
        50.0,
        1,
        "2025-01-01",
        RecurringKind::Transfer {
            from_account_id: "acc_bank".to_string(),
            from_method_id: None,
            to_account_id: "acc_piggy".to_string(),
            to_method_id: None,
            to_goal_id: Some("g1".to_string()),
        },
    )];
    snapshot.transactions = vec![
        income_txn("t1", 500.0, "acc_bank", "2025-01-01"),
        // Destination holds only 40: reserving 50 would exceed it.
        income_txn("t2", 40.0, "acc_piggy", "2025-01-01"),
    ];

    let expansion = expand_due(&snapshot, date("2025-02-15"));
    assert!(expansion.is_empty());

    snapshot
        .transactions
        .push(income_txn("t3", 20.0, "acc_piggy", "2025-01-10"));
    let expansion = expand_due(&snapshot, date("2025-02-15"));
    assert_eq!(expansion.new_transactions.len(), 1);
    assert_eq!(expansion.updated_goals[0].current, 50.0);

    // The earmark leg never moves spendable balance.
    let snapshot = expansion.apply(snapshot);
    assert_eq!(account_balance(&snapshot.transactions, "acc_bank"), 500.0);
    assert_eq!(account_balance(&snapshot.transactions, "acc_piggy"), 60.0);
}

#[test]
fn test_occurrence_cap_bounds_a_single_pass() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![RecurringRule {
        frequency: Frequency::Weekly,
        ..monthly_rule("r1", 1.0, 1, "2015-01-05", income_kind("acc_bank"))
    }];

    let expansion = expand_due(&snapshot, date("2025-06-15"));
    assert_eq!(expansion.new_transactions.len(), MAX_OCCURRENCES_PER_RULE);
}

#[test]
fn test_unknown_frequency_rule_is_inert() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![RecurringRule {
        frequency: Frequency::Unknown,
        ..monthly_rule("r1", 10.0, 1, "2020-01-01", income_kind("acc_bank"))
    }];
    assert!(expand_due(&snapshot, date("2025-06-15")).is_empty());
}

#[test]
fn test_rule_without_anchor_is_skipped() {
    let mut snapshot = fixture();
    let mut rule = monthly_rule("r1", 10.0, 1, "2025-01-01", income_kind("acc_bank"));
    rule.start_date = None;
    rule.last_applied = None;
    snapshot.recurring_rules = vec![rule];
    assert!(expand_due(&snapshot, date("2025-06-15")).is_empty());
}

#[test]
fn test_execute_now_dates_today_and_keeps_cursor() {
    let mut snapshot = fixture();
    snapshot.transactions = vec![income_txn("t1", 100.0, "acc_bank", "2025-01-01")];
    snapshot.recurring_rules = vec![monthly_rule(
        "r1",
        30.0,
        5,
        "2025-01-05",
        expense_kind("acc_bank"),
    )];
    snapshot.recurring_rules[0].last_applied = Some(date("2025-03-05"));

    let today = date("2025-03-20");
    let expansion = execute_now(&snapshot, "r1", today).unwrap();
    assert_eq!(expansion.new_transactions.len(), 1);
    assert_eq!(expansion.new_transactions[0].date, today);
    assert_eq!(
        expansion.updated_rules[0].last_applied,
        Some(date("2025-03-05"))
    );
}

#[test]
fn test_execute_now_surfaces_insufficient_funds() {
    let mut snapshot = fixture();
    snapshot.recurring_rules = vec![monthly_rule(
        "r1",
        30.0,
        5,
        "2025-01-05",
        expense_kind("acc_bank"),
    )];
    let err = execute_now(&snapshot, "r1", date("2025-03-20")).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::InsufficientFunds { .. })
    ));
}

#[test]
fn test_execute_now_unknown_rule() {
    let snapshot = fixture();
    let err = execute_now(&snapshot, "nope", date("2025-03-20")).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::UnknownRule(id)) if id == "nope"
    ));
}

proptest! {
    // Materialized dates are strictly increasing and never pass `today`,
    // whatever nominal day and anchor the rule carries.
    #[test]
    fn prop_monthly_dates_increase_and_stay_due(
        day in 1u32..=31,
        anchor_offset in 0i64..365,
        horizon in 0i64..730,
    ) {
        let anchor = date("2024-01-01") + chrono::Duration::days(anchor_offset);
        let today = anchor + chrono::Duration::days(horizon);

        let mut snapshot = fixture();
        let mut rule = monthly_rule("r1", 10.0, day, "2024-01-01", income_kind("acc_bank"));
        rule.start_date = Some(anchor);
        snapshot.recurring_rules = vec![rule];

        let expansion = expand_due(&snapshot, today);
        let dates: Vec<NaiveDate> = expansion.new_transactions.iter().map(|t| t.date).collect();
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(dates.iter().all(|d| *d <= today && *d > anchor));
    }
}
