//! One-way import adapters for the two legacy document shapes.
//!
//! Detection is by marker key: a `recurring` object means the oldest
//! page schema (name-keyed banks and methods, string categories), a
//! `recurringPayments` array means the tools-page schema (id-keyed but
//! cursorless rules). Anything else parses as the canonical shape.
//!
//! Import is lossy where the legacy shape is: records that cannot be
//! resolved into the canonical model are dropped with a warning rather
//! than failing the whole document.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::accounts::{Account, AccountKind};
use crate::categories::{Categories, Category};
use crate::constants::DEFAULT_CURRENCY;
use crate::errors::SnapshotError;
use crate::goals::Goal;
use crate::methods::{MethodKind, PaymentMethod};
use crate::recurring::{Frequency, RecurringKind, RecurringRule};
use crate::snapshot::Snapshot;
use crate::transactions::{Transaction, TransactionKind};
use crate::utils::date_utils::{clamped_ymd, prev_month_day, prev_year_day};
use crate::utils::new_id;
use crate::Result;

/// Parses a document of any supported vintage into a canonical snapshot.
///
/// `today` anchors cursorless v1 rules so their next occurrence lands on
/// the nominal day of the current period, exactly where the original
/// generator would have placed it.
pub fn import_snapshot(json: &str, today: NaiveDate) -> Result<Snapshot> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(SnapshotError::Malformed("Document is not an object".to_string()).into());
    };

    if object.get("recurring").is_some_and(Value::is_object) {
        return import_v1(json, today);
    }
    if object.contains_key("recurringPayments") {
        return import_tools(value);
    }
    Snapshot::from_json(json)
}

// Tools-page schema: canonical records, but rules live under
// `recurringPayments` with no frequency or cursor, and older accounts may
// still carry the pre-split `wallet` kind.
fn import_tools(mut value: Value) -> Result<Snapshot> {
    if let Some(object) = value.as_object_mut() {
        if let Some(rules) = object.remove("recurringPayments") {
            object.insert("recurringRules".to_string(), rules);
        }
        if let Some(banks) = object.get_mut("banks").and_then(Value::as_array_mut) {
            for bank in banks {
                if bank.get("type").and_then(Value::as_str) == Some("wallet") {
                    bank["type"] = Value::from("wallet_physical");
                }
            }
        }
        if let Some(rules) = object
            .get_mut("recurringRules")
            .and_then(Value::as_array_mut)
        {
            for rule in rules.iter_mut().filter_map(Value::as_object_mut) {
                // No schedule in this shape: mark the rule inert so it only
                // runs on demand.
                rule.entry("frequency").or_insert_with(|| "unknown".into());
            }
        }
    }
    let snapshot: Snapshot =
        serde_json::from_value(value).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
    Ok(snapshot)
}

// v1 page schema

#[derive(Deserialize, Default)]
struct V1Categories {
    #[serde(default)]
    income: Vec<String>,
    #[serde(default)]
    expense: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct V1Recurring {
    #[serde(default)]
    incomes: Vec<V1Rule>,
    #[serde(default)]
    expenses: Vec<V1Rule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Bank {
    id: String,
    name: String,
    #[serde(default)]
    colour: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Goal {
    id: String,
    name: String,
    target: f64,
    #[serde(default)]
    saved: f64,
    #[serde(default)]
    colour: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Transaction {
    id: String,
    #[serde(rename = "type")]
    txn_type: String,
    amount: f64,
    date: NaiveDate,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    bank: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    recurring_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Rule {
    id: String,
    name: String,
    amount: f64,
    #[serde(default)]
    day: Option<u32>,
    #[serde(default)]
    month: Option<u32>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    bank: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    frequency: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V1Document {
    #[serde(default)]
    base_currency: Option<String>,
    #[serde(default)]
    transactions: Vec<V1Transaction>,
    #[serde(default)]
    categories: V1Categories,
    #[serde(default)]
    category_colours: HashMap<String, String>,
    #[serde(default)]
    method_colours: HashMap<String, String>,
    #[serde(default)]
    payment_methods: Vec<String>,
    #[serde(default)]
    banks: Vec<V1Bank>,
    #[serde(default)]
    goals: Vec<V1Goal>,
    #[serde(default)]
    recurring: V1Recurring,
}

fn method_kind_for_name(name: &str) -> MethodKind {
    let lower = name.to_lowercase();
    if lower.contains("card") {
        MethodKind::Card
    } else if lower.contains("cash") {
        MethodKind::Cash
    } else if lower.contains("wallet") {
        MethodKind::Wallet
    } else if lower.contains("crypto") {
        MethodKind::Crypto
    } else if lower.contains("bank") || lower.contains("transfer") {
        MethodKind::Bank
    } else {
        MethodKind::Other
    }
}

fn v1_frequency(raw: &str) -> Frequency {
    match raw {
        "monthly" => Frequency::Monthly,
        "annual" => Frequency::Yearly,
        "weekly" => Frequency::Weekly,
        other => {
            if !other.is_empty() {
                warn!("unsupported v1 frequency '{other}', importing as inert");
            }
            Frequency::Unknown
        }
    }
}

/// Anchor for a cursorless v1 rule: one period before the occurrence the
/// original generator would emit next, so stepping forward reproduces it.
fn v1_anchor(frequency: Frequency, day: u32, month: Option<u32>, today: NaiveDate) -> Option<NaiveDate> {
    match frequency {
        Frequency::Monthly => {
            let mut candidate = clamped_ymd(today.year(), today.month(), day)?;
            if candidate > today {
                candidate = prev_month_day(candidate, day)?;
            }
            prev_month_day(candidate, day)
        }
        Frequency::Yearly => {
            let mut candidate = clamped_ymd(today.year(), month.unwrap_or(1).clamp(1, 12), day)?;
            if candidate > today {
                candidate = prev_year_day(candidate)?;
            }
            prev_year_day(candidate)
        }
        Frequency::Weekly | Frequency::Unknown => None,
    }
}

fn import_v1(json: &str, today: NaiveDate) -> Result<Snapshot> {
    let document: V1Document =
        serde_json::from_str(json).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
    let currency = document
        .base_currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    // v1 has no per-method balances: everything on a bank pools together.
    let accounts: Vec<Account> = document
        .banks
        .iter()
        .map(|bank| Account {
            id: bank.id.clone(),
            name: bank.name.clone(),
            kind: AccountKind::Bank,
            currency: currency.clone(),
            colour: bank.colour.clone(),
            shared_balance: true,
        })
        .collect();
    let account_by_name: HashMap<&str, &str> = document
        .banks
        .iter()
        .map(|b| (b.name.as_str(), b.id.as_str()))
        .collect();
    let first_account = accounts.first().map(|a| a.id.clone());

    let payment_methods: Vec<PaymentMethod> = match &first_account {
        Some(account_id) => document
            .payment_methods
            .iter()
            .map(|name| PaymentMethod {
                id: new_id(),
                kind: method_kind_for_name(name),
                name: name.clone(),
                account_id: account_id.clone(),
                colour: document.method_colours.get(name).cloned().unwrap_or_default(),
            })
            .collect(),
        None => {
            if !document.payment_methods.is_empty() {
                warn!("v1 document has payment methods but no banks, dropping them");
            }
            Vec::new()
        }
    };
    let method_by_name: HashMap<&str, &str> = document
        .payment_methods
        .iter()
        .zip(&payment_methods)
        .map(|(name, method)| (name.as_str(), method.id.as_str()))
        .collect();

    let build_categories = |names: &[String]| {
        names
            .iter()
            .map(|name| Category {
                id: new_id(),
                name: name.clone(),
                colour: document
                    .category_colours
                    .get(name)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect::<Vec<_>>()
    };
    let categories = Categories {
        income: build_categories(&document.categories.income),
        expense: build_categories(&document.categories.expense),
    };
    let category_id_for = |list: &[Category], name: Option<&str>| {
        name.and_then(|n| list.iter().find(|c| c.name == n))
            .map(|c| c.id.clone())
    };

    let goals: Vec<Goal> = match &first_account {
        Some(account_id) => document
            .goals
            .iter()
            .map(|goal| Goal {
                id: goal.id.clone(),
                name: goal.name.clone(),
                colour: goal.colour.clone(),
                account_id: account_id.clone(),
                target: goal.target,
                current: goal.saved,
                start_date: None,
                target_date: None,
            })
            .collect(),
        None => {
            if !document.goals.is_empty() {
                warn!("v1 document has goals but no banks, dropping them");
            }
            Vec::new()
        }
    };

    let resolve_account = |bank: Option<&str>| {
        bank.and_then(|name| account_by_name.get(name).copied())
            .map(str::to_string)
            .or_else(|| first_account.clone())
    };

    let mut transactions: Vec<Transaction> = Vec::new();
    for txn in &document.transactions {
        let Some(account_id) = resolve_account(txn.bank.as_deref()) else {
            warn!("v1 transaction {} has no resolvable account, skipping", txn.id);
            continue;
        };
        let method_id = txn
            .payment_method
            .as_deref()
            .and_then(|name| method_by_name.get(name).copied())
            .map(str::to_string);
        let kind = match txn.txn_type.as_str() {
            "income" => TransactionKind::Income {
                account_id,
                method_id,
                source: None,
            },
            "expense" => TransactionKind::Expense {
                account_id,
                method_id,
            },
            other => {
                // v1 "transfers" carry no endpoints the canonical model can
                // represent.
                warn!("v1 transaction {} has unsupported type '{other}', skipping", txn.id);
                continue;
            }
        };
        let category_list = match &kind {
            TransactionKind::Income { .. } => &categories.income,
            _ => &categories.expense,
        };
        transactions.push(Transaction {
            id: txn.id.clone(),
            amount: txn.amount,
            date: txn.date,
            category: txn.category.clone(),
            category_id: category_id_for(category_list, txn.category.as_deref()),
            note: txn.note.clone(),
            recurring_id: txn.recurring_id.clone(),
            kind,
        });
    }

    let mut recurring_rules: Vec<RecurringRule> = Vec::new();
    let mut import_rules = |rules: &[V1Rule], is_income: bool| {
        for rule in rules {
            let Some(account_id) = resolve_account(rule.bank.as_deref()) else {
                warn!("v1 rule {} has no resolvable account, skipping", rule.id);
                continue;
            };
            let method_id = rule
                .payment_method
                .as_deref()
                .and_then(|name| method_by_name.get(name).copied())
                .map(str::to_string);
            let kind = if is_income {
                RecurringKind::Income {
                    account_id,
                    method_id,
                    source: None,
                }
            } else {
                RecurringKind::Expense {
                    account_id,
                    method_id,
                }
            };
            let frequency = v1_frequency(&rule.frequency);
            let day = rule.day.unwrap_or(1).clamp(1, 31);
            let last_applied = transactions
                .iter()
                .filter(|t| t.recurring_id.as_deref() == Some(rule.id.as_str()))
                .map(|t| t.date)
                .max();
            let start_date = if last_applied.is_none() {
                v1_anchor(frequency, day, rule.month, today)
            } else {
                None
            };
            let category_list = if is_income {
                &categories.income
            } else {
                &categories.expense
            };
            recurring_rules.push(RecurringRule {
                id: rule.id.clone(),
                amount: rule.amount,
                frequency,
                day,
                start_date,
                last_applied,
                category: rule.category.clone(),
                category_id: category_id_for(category_list, rule.category.as_deref()),
                note: Some(rule.name.clone()),
                kind,
            });
        }
    };
    import_rules(&document.recurring.incomes, true);
    import_rules(&document.recurring.expenses, false);

    Ok(Snapshot {
        base_currency: currency,
        accounts,
        payment_methods,
        categories,
        goals,
        recurring_rules,
        transactions,
        ..Snapshot::default()
    })
}
