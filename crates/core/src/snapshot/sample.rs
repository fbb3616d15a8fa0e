//! Built-in starter dataset.
//!
//! Loaded when no stored document exists or the stored one cannot be
//! decoded, so a fresh install always opens on something meaningful
//! instead of a blank ledger.

use chrono::NaiveDate;
use log::warn;

use crate::accounts::{Account, AccountKind};
use crate::categories::{Categories, Category};
use crate::goals::Goal;
use crate::methods::{MethodKind, PaymentMethod};
use crate::recurring::{Frequency, RecurringKind, RecurringRule};
use crate::snapshot::Snapshot;
use crate::transactions::{Transaction, TransactionKind};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn account(id: &str, name: &str, kind: AccountKind, currency: &str, colour: &str) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        currency: currency.to_string(),
        colour: colour.to_string(),
        shared_balance: false,
    }
}

fn method(id: &str, kind: MethodKind, name: &str, account_id: &str, colour: &str) -> PaymentMethod {
    PaymentMethod {
        id: id.to_string(),
        kind,
        name: name.to_string(),
        account_id: account_id.to_string(),
        colour: colour.to_string(),
    }
}

fn category(id: &str, name: &str, colour: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        colour: colour.to_string(),
    }
}

fn income(
    id: &str,
    amount: f64,
    on: NaiveDate,
    account_id: &str,
    method_id: Option<&str>,
    category: &str,
    note: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount,
        date: on,
        category: Some(category.to_string()),
        category_id: None,
        note: Some(note.to_string()),
        recurring_id: None,
        kind: TransactionKind::Income {
            account_id: account_id.to_string(),
            method_id: method_id.map(str::to_string),
            source: None,
        },
    }
}

fn expense(
    id: &str,
    amount: f64,
    on: NaiveDate,
    account_id: &str,
    method_id: &str,
    category: &str,
    note: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount,
        date: on,
        category: Some(category.to_string()),
        category_id: None,
        note: Some(note.to_string()),
        recurring_id: None,
        kind: TransactionKind::Expense {
            account_id: account_id.to_string(),
            method_id: Some(method_id.to_string()),
        },
    }
}

impl Snapshot {
    /// The starter dataset: five accounts, a month of activity and two
    /// scheduled rules.
    pub fn sample() -> Snapshot {
        let mut snapshot = Snapshot::default();

        snapshot.accounts = vec![
            account("acc_bank_main", "Main Bank", AccountKind::Bank, "EUR", "#2E86DE"),
            account("acc_wallet", "Cash Wallet", AccountKind::WalletPhysical, "EUR", "#F39C12"),
            account("acc_wallet_online", "Online Wallet", AccountKind::WalletOnline, "EUR", "#003087"),
            account("acc_crypto", "Crypto Wallet", AccountKind::Crypto, "BTC", "#F2A900"),
            account("acc_piggy", "Piggy Bank", AccountKind::Piggy, "EUR", "#A3A3A3"),
        ];

        snapshot.payment_methods = vec![
            method("met_card_visa", MethodKind::Card, "Visa", "acc_bank_main", "#2E86DE"),
            method("met_cash_wallet", MethodKind::Cash, "Cash", "acc_wallet", "#F39C12"),
            method("met_wallet_paypal", MethodKind::Wallet, "PayPal", "acc_wallet_online", "#003087"),
            method("met_crypto_btc", MethodKind::Crypto, "BTC", "acc_crypto", "#F2A900"),
        ];

        snapshot.categories = Categories {
            income: vec![
                category("cat_income_salary", "Salary", "#2ECC71"),
                category("cat_income_topup", "Top-up", "#34D399"),
            ],
            expense: vec![
                category("cat_exp_subscriptions", "Subscriptions", "#9CA3AF"),
                category("cat_exp_services", "Services", "#60A5FA"),
                category("cat_exp_dining", "Dining", "#F97316"),
                category("cat_exp_transport", "Transport", "#F59E0B"),
            ],
        };

        snapshot.transactions = vec![
            income("t_open_bank", 10000.0, date(2025, 11, 1), "acc_bank_main", Some("met_card_visa"), "Top-up", "Initial top-up"),
            income("t_open_cash", 5000.0, date(2025, 11, 1), "acc_wallet", Some("met_cash_wallet"), "Top-up", "Initial cash"),
            income("t_open_online", 1000.0, date(2025, 11, 1), "acc_wallet_online", Some("met_wallet_paypal"), "Top-up", "Initial wallet"),
            income("t_open_crypto", 100.0, date(2025, 11, 1), "acc_crypto", Some("met_crypto_btc"), "Top-up", "Initial crypto"),
            income("t_open_piggy", 100.0, date(2025, 11, 1), "acc_piggy", None, "Top-up", "Initial piggy"),
            income("t_salary_nov", 1000.0, date(2025, 11, 3), "acc_bank_main", Some("met_card_visa"), "Salary", "Monthly salary"),
            Transaction {
                id: "t_transfer_bank_to_online".to_string(),
                amount: 500.0,
                date: date(2025, 11, 4),
                category: None,
                category_id: None,
                note: Some("Top up online wallet".to_string()),
                recurring_id: None,
                kind: TransactionKind::Transfer {
                    from_account_id: "acc_bank_main".to_string(),
                    from_method_id: Some("met_card_visa".to_string()),
                    to_account_id: "acc_wallet_online".to_string(),
                    to_method_id: Some("met_wallet_paypal".to_string()),
                    to_goal_id: None,
                },
            },
            expense("t_netflix_nov", 10.0, date(2025, 11, 5), "acc_wallet_online", "met_wallet_paypal", "Subscriptions", "Netflix"),
            expense("t_pec_year", 20.0, date(2025, 11, 6), "acc_bank_main", "met_card_visa", "Services", "PEC annual fee"),
            expense("t_restaurant", 100.0, date(2025, 11, 7), "acc_wallet", "met_cash_wallet", "Dining", "Restaurant"),
            expense("t_taxi", 50.0, date(2025, 11, 8), "acc_wallet", "met_cash_wallet", "Transport", "Taxi"),
        ];

        snapshot.goals = vec![
            Goal {
                id: "g1".to_string(),
                name: "Holiday Fund".to_string(),
                colour: "#FF7F50".to_string(),
                account_id: "acc_bank_main".to_string(),
                target: 2000.0,
                current: 450.0,
                start_date: Some(date(2025, 1, 1)),
                target_date: Some(date(2025, 12, 31)),
            },
            Goal {
                id: "g2".to_string(),
                name: "Emergency Fund".to_string(),
                colour: "#2E86DE".to_string(),
                account_id: "acc_piggy".to_string(),
                target: 5000.0,
                current: 1200.0,
                start_date: Some(date(2025, 1, 1)),
                target_date: Some(date(2026, 12, 31)),
            },
        ];

        snapshot.recurring_rules = vec![
            RecurringRule {
                id: "rec_salary".to_string(),
                amount: 1000.0,
                frequency: Frequency::Monthly,
                day: 3,
                start_date: None,
                last_applied: Some(date(2025, 11, 3)),
                category: Some("Salary".to_string()),
                category_id: Some("cat_income_salary".to_string()),
                note: Some("Monthly salary".to_string()),
                kind: RecurringKind::Income {
                    account_id: "acc_bank_main".to_string(),
                    method_id: Some("met_card_visa".to_string()),
                    source: None,
                },
            },
            RecurringRule {
                id: "rec_netflix".to_string(),
                amount: 10.0,
                frequency: Frequency::Monthly,
                day: 5,
                start_date: None,
                last_applied: Some(date(2025, 11, 5)),
                category: Some("Subscriptions".to_string()),
                category_id: Some("cat_exp_subscriptions".to_string()),
                note: Some("Netflix".to_string()),
                kind: RecurringKind::Expense {
                    account_id: "acc_wallet_online".to_string(),
                    method_id: Some("met_wallet_paypal".to_string()),
                },
            },
        ];

        snapshot
    }

    /// Decodes `json`, falling back to the starter dataset when the text
    /// is missing or unreadable. A fresh install never opens on an error.
    pub fn from_json_or_sample(json: Option<&str>) -> Snapshot {
        match json {
            None => Snapshot::sample(),
            Some(text) => Snapshot::from_json(text).unwrap_or_else(|e| {
                warn!("stored snapshot is unreadable ({e}), falling back to sample data");
                Snapshot::sample()
            }),
        }
    }
}
