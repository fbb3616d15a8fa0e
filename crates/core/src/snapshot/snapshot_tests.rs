use chrono::NaiveDate;

use crate::accounts::{Account, AccountKind};
use crate::categories::{Category, CategoryKind};
use crate::errors::{Error, ValidationError};
use crate::methods::{MethodKind, PaymentMethod};
use crate::recurring::{execute_now, expand_due, Frequency};
use crate::snapshot::{import_snapshot, Snapshot};
use crate::transactions::TransactionKind;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_sample_dataset_validates() {
    let snapshot = Snapshot::sample();
    snapshot.validate().unwrap();
    assert!(!snapshot.accounts.is_empty());
    assert!(!snapshot.recurring_rules.is_empty());
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let snapshot = Snapshot::sample();
    let json = snapshot.to_json_pretty().unwrap();
    let parsed = Snapshot::from_json(&json).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn test_accounts_serialize_under_banks_key() {
    let json = Snapshot::sample().to_json_pretty().unwrap();
    assert!(json.contains("\"banks\""));
    assert!(!json.contains("\"accounts\""));
}

#[test]
fn test_method_sentinels_normalize_to_none() {
    let json = r#"{
        "banks": [{ "id": "a1", "name": "Bank", "type": "bank" }],
        "transactions": [
            { "id": "t1", "type": "income", "amount": 10, "date": "2025-01-01",
              "accountId": "a1", "methodId": "none", "category": "" },
            { "id": "t2", "type": "expense", "amount": 5, "date": "2025-01-02",
              "accountId": "a1", "methodId": "" }
        ]
    }"#;
    let snapshot = Snapshot::from_json(json).unwrap();
    match &snapshot.transactions[0].kind {
        TransactionKind::Income { method_id, .. } => assert!(method_id.is_none()),
        other => panic!("expected income, got {other:?}"),
    }
    assert!(snapshot.transactions[0].category.is_none());
    match &snapshot.transactions[1].kind {
        TransactionKind::Expense { method_id, .. } => assert!(method_id.is_none()),
        other => panic!("expected expense, got {other:?}"),
    }
}

#[test]
fn test_unknown_account_kind_falls_back_to_other() {
    let json = r#"{ "banks": [{ "id": "a1", "name": "X", "type": "space_bank" }] }"#;
    let snapshot = Snapshot::from_json(json).unwrap();
    assert_eq!(snapshot.accounts[0].kind, AccountKind::Other);
}

#[test]
fn test_from_json_or_sample_falls_back() {
    assert_eq!(Snapshot::from_json_or_sample(None), Snapshot::sample());
    assert_eq!(
        Snapshot::from_json_or_sample(Some("not json at all")),
        Snapshot::sample()
    );
    let empty = Snapshot::default();
    let kept = Snapshot::from_json_or_sample(Some(&empty.to_json_pretty().unwrap()));
    assert_eq!(kept, empty);
}

const V1_DOCUMENT: &str = r##"{
    "version": "1.0",
    "baseCurrency": "EUR",
    "transactions": [
        { "id": "t1", "type": "income", "amount": 2000, "currency": "EUR",
          "category": "Salary", "bank": "Main Bank", "date": "2025-02-01",
          "note": "Monthly salary", "recurringId": "rec1" },
        { "id": "t2", "type": "expense", "amount": 100, "currency": "EUR",
          "category": "Groceries", "paymentMethod": "Debit Card",
          "bank": "Main Bank", "date": "2025-02-10", "note": "Supermarket" },
        { "id": "t3", "type": "transfer", "amount": 50, "currency": "EUR",
          "date": "2025-02-11" }
    ],
    "categories": { "income": ["Salary"], "expense": ["Groceries", "Housing"] },
    "categoryColours": { "Salary": "#2ecc71" },
    "methodColours": { "Debit Card": "#2980b9" },
    "paymentMethods": ["Cash", "Debit Card", "Bank Transfer"],
    "banks": [
        { "id": "b1", "name": "Main Bank", "colour": "#2E86DE" },
        { "id": "b2", "name": "Secondary Bank", "colour": "#27AE60" }
    ],
    "goals": [
        { "id": "g1", "name": "Vacation", "target": 1000, "saved": 250, "colour": "#FF7F50" }
    ],
    "recurring": {
        "incomes": [
            { "id": "rec1", "name": "Monthly Salary", "amount": 2000, "day": 1,
              "category": "Salary", "bank": "Main Bank", "frequency": "monthly" }
        ],
        "expenses": [
            { "id": "rec2", "name": "Insurance", "amount": 300, "day": 15, "month": 6,
              "bank": "Main Bank", "paymentMethod": "Bank Transfer", "frequency": "annual" }
        ]
    }
}"##;

#[test]
fn test_v1_import_builds_canonical_records() {
    let snapshot = import_snapshot(V1_DOCUMENT, date("2025-03-10")).unwrap();
    snapshot.validate().unwrap();

    // Banks become pooled-balance accounts keyed by their old ids.
    assert_eq!(snapshot.accounts.len(), 2);
    assert!(snapshot.accounts.iter().all(|a| a.shared_balance));
    assert_eq!(snapshot.accounts[0].kind, AccountKind::Bank);

    // Method and category strings gain ids; colours carry over.
    assert_eq!(snapshot.payment_methods.len(), 3);
    let debit = snapshot
        .payment_methods
        .iter()
        .find(|m| m.name == "Debit Card")
        .unwrap();
    assert_eq!(debit.kind, MethodKind::Card);
    assert_eq!(debit.colour, "#2980b9");
    assert_eq!(snapshot.categories.expense.len(), 2);

    // Goals attach to the first account, keeping their saved counter.
    assert_eq!(snapshot.goals[0].account_id, "b1");
    assert_eq!(snapshot.goals[0].current, 250.0);

    // Name references resolve to ids; the endpoint-less transfer is dropped.
    assert_eq!(snapshot.transactions.len(), 2);
    match &snapshot.transactions[1].kind {
        TransactionKind::Expense { account_id, method_id } => {
            assert_eq!(account_id, "b1");
            assert_eq!(method_id.as_deref(), Some(debit.id.as_str()));
        }
        other => panic!("expected expense, got {other:?}"),
    }
    assert!(snapshot.transactions[1].category_id.is_some());
}

#[test]
fn test_v1_import_anchors_rules() {
    let today = date("2025-03-10");
    let snapshot = import_snapshot(V1_DOCUMENT, today).unwrap();

    // rec1 has a generated transaction on record: the cursor picks up there.
    let salary = snapshot.rule("rec1").unwrap();
    assert_eq!(salary.last_applied, Some(date("2025-02-01")));

    // rec2 never ran: it is anchored so its next occurrence is the nominal
    // day of the current period (Jun 15 of last year, due again Jun 15).
    let insurance = snapshot.rule("rec2").unwrap();
    assert_eq!(insurance.frequency, Frequency::Yearly);
    assert_eq!(insurance.last_applied, None);
    assert_eq!(insurance.start_date, Some(date("2023-06-15")));

    // Expanding from here materializes Mar 1 salary and the 2024 insurance
    // payment, funded by the imported history.
    let expansion = expand_due(&snapshot, today);
    let mut dates: Vec<NaiveDate> = expansion.new_transactions.iter().map(|t| t.date).collect();
    dates.sort();
    assert_eq!(dates, vec![date("2024-06-15"), date("2025-03-01")]);
}

#[test]
fn test_tools_import_migrates_wallet_kind_and_inert_rules() {
    let json = r#"{
        "banks": [
            { "id": "a1", "name": "Bank", "type": "bank", "currency": "EUR" },
            { "id": "a2", "name": "Wallet", "type": "wallet", "currency": "EUR" }
        ],
        "paymentMethods": [
            { "id": "m1", "type": "cash", "name": "Cash", "accountId": "a2" }
        ],
        "transactions": [
            { "id": "t1", "type": "income", "amount": 100, "date": "2025-01-01",
              "accountId": "a1", "methodId": "" }
        ],
        "recurringPayments": [
            { "id": "r1", "type": "expense", "amount": 10, "accountId": "a1",
              "methodId": "", "category": "Bills", "note": "Electricity" }
        ]
    }"#;
    let today = date("2025-06-01");
    let snapshot = import_snapshot(json, today).unwrap();
    snapshot.validate().unwrap();

    assert_eq!(snapshot.accounts[1].kind, AccountKind::WalletPhysical);

    // Cursorless rules never expand on their own but do run on demand.
    let rule = snapshot.rule("r1").unwrap();
    assert_eq!(rule.frequency, Frequency::Unknown);
    assert!(expand_due(&snapshot, today).is_empty());
    let expansion = execute_now(&snapshot, "r1", today).unwrap();
    assert_eq!(expansion.new_transactions[0].date, today);
}

#[test]
fn test_canonical_documents_pass_through_import() {
    let sample = Snapshot::sample();
    let json = sample.to_json_pretty().unwrap();
    let imported = import_snapshot(&json, date("2025-12-01")).unwrap();
    assert_eq!(imported, sample);
}

#[test]
fn test_remove_account_blocked_while_referenced() {
    let snapshot = Snapshot::sample();
    let err = snapshot.remove_account("acc_bank_main").unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::AccountInUse(_))
    ));
}

#[test]
fn test_remove_account_cascades_methods() {
    let snapshot = Snapshot::default()
        .add_account(Account {
            id: "a1".to_string(),
            name: "Bank".to_string(),
            kind: AccountKind::Bank,
            currency: "EUR".to_string(),
            colour: String::new(),
            shared_balance: false,
        })
        .unwrap()
        .add_method(PaymentMethod {
            id: "m1".to_string(),
            kind: MethodKind::Card,
            name: "Visa".to_string(),
            account_id: "a1".to_string(),
            colour: String::new(),
        })
        .unwrap();

    let snapshot = snapshot.remove_account("a1").unwrap();
    assert!(snapshot.accounts.is_empty());
    assert!(snapshot.payment_methods.is_empty());
}

#[test]
fn test_add_method_enforces_account_kind() {
    let snapshot = Snapshot::default()
        .add_account(Account {
            id: "a1".to_string(),
            name: "Bank".to_string(),
            kind: AccountKind::Bank,
            currency: "EUR".to_string(),
            colour: String::new(),
            shared_balance: false,
        })
        .unwrap();
    let err = snapshot
        .add_method(PaymentMethod {
            id: "m1".to_string(),
            kind: MethodKind::Cash,
            name: "Cash".to_string(),
            account_id: "a1".to_string(),
            colour: String::new(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MethodTypeNotAllowed { .. })
    ));
}

#[test]
fn test_remove_method_blocked_while_referenced() {
    let snapshot = Snapshot::sample();
    let err = snapshot.remove_method("met_card_visa").unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MethodInUse(_))
    ));
}

#[test]
fn test_category_names_unique_within_list() {
    let snapshot = Snapshot::sample();
    let err = snapshot
        .add_category(
            CategoryKind::Expense,
            Category {
                id: "c_new".to_string(),
                name: "Dining".to_string(),
                colour: String::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::DuplicateCategory(_))
    ));

    // Same name in the other list is fine.
    snapshot
        .add_category(
            CategoryKind::Income,
            Category {
                id: "c_new".to_string(),
                name: "Dining".to_string(),
                colour: String::new(),
            },
        )
        .unwrap();
}

#[test]
fn test_remove_goal_blocked_by_rule_reference() {
    let mut snapshot = Snapshot::sample();
    snapshot.recurring_rules.push(crate::recurring::RecurringRule {
        id: "rec_goal".to_string(),
        amount: 25.0,
        frequency: Frequency::Monthly,
        day: 1,
        start_date: None,
        last_applied: None,
        category: None,
        category_id: None,
        note: None,
        kind: crate::recurring::RecurringKind::Transfer {
            from_account_id: "acc_bank_main".to_string(),
            from_method_id: None,
            to_account_id: "acc_piggy".to_string(),
            to_method_id: None,
            to_goal_id: Some("g2".to_string()),
        },
    });
    let err = snapshot.remove_goal("g2").unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::GoalInUse(_))
    ));
    snapshot.remove_goal("g1").unwrap();
}
