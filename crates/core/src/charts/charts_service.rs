//! Aggregation engine behind the dashboard charts.
//!
//! Everything here is a pure fold over the transaction log. Dangling
//! references (a deleted category or method still named by an old
//! transaction) are not errors at this layer; they fall into the "Other"
//! bucket so historical charts keep rendering.

use std::collections::HashMap;

use crate::accounts::{Account, AccountKind};
use crate::categories::Category;
use crate::constants::{DEFAULT_CURRENCY, OTHER_BUCKET};
use crate::methods::PaymentMethod;
use crate::snapshot::Snapshot;
use crate::transactions::{Transaction, TransactionKind, TransactionType};

use super::{Holdings, TrendPoint};

/// Borrowed id-to-record lookup maps, built once per chart render.
pub struct SnapshotIndex<'a> {
    pub income_categories: HashMap<&'a str, &'a Category>,
    pub expense_categories: HashMap<&'a str, &'a Category>,
    pub methods: HashMap<&'a str, &'a PaymentMethod>,
    pub accounts: HashMap<&'a str, &'a Account>,
}

impl<'a> SnapshotIndex<'a> {
    pub fn build(snapshot: &'a Snapshot) -> Self {
        SnapshotIndex {
            income_categories: snapshot
                .categories
                .income
                .iter()
                .map(|c| (c.id.as_str(), c))
                .collect(),
            expense_categories: snapshot
                .categories
                .expense
                .iter()
                .map(|c| (c.id.as_str(), c))
                .collect(),
            methods: snapshot
                .payment_methods
                .iter()
                .map(|m| (m.id.as_str(), m))
                .collect(),
            accounts: snapshot
                .accounts
                .iter()
                .map(|a| (a.id.as_str(), a))
                .collect(),
        }
    }
}

/// Display bucket for a transaction's category: id-based lookup first,
/// then the legacy display string, then "Other".
fn category_bucket(txn: &Transaction, index: &SnapshotIndex<'_>) -> String {
    if let Some(category_id) = txn.category_id.as_deref() {
        let map = match txn.txn_type() {
            TransactionType::Income => Some(&index.income_categories),
            TransactionType::Expense => Some(&index.expense_categories),
            TransactionType::Transfer => None,
        };
        if let Some(map) = map {
            return map
                .get(category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| OTHER_BUCKET.to_string());
        }
    }
    txn.category
        .clone()
        .unwrap_or_else(|| OTHER_BUCKET.to_string())
}

/// Display bucket for a transaction's payment method kind.
fn payment_type_bucket(txn: &Transaction, index: &SnapshotIndex<'_>) -> String {
    let method_id = match txn.single_leg() {
        Some((_, Some(method_id))) => method_id,
        _ => return OTHER_BUCKET.to_string(),
    };
    index
        .methods
        .get(method_id)
        .map(|m| m.kind.label().to_string())
        .unwrap_or_else(|| OTHER_BUCKET.to_string())
}

/// Sums amounts of `txn_type` transactions per category bucket.
pub fn aggregate_by_category(
    transactions: &[Transaction],
    index: &SnapshotIndex<'_>,
    txn_type: TransactionType,
) -> HashMap<String, f64> {
    let mut result: HashMap<String, f64> = HashMap::new();
    for txn in transactions.iter().filter(|t| t.txn_type() == txn_type) {
        *result.entry(category_bucket(txn, index)).or_insert(0.0) += txn.amount;
    }
    result
}

/// Sums amounts of `txn_type` transactions per payment-method kind.
pub fn aggregate_by_payment_type(
    transactions: &[Transaction],
    index: &SnapshotIndex<'_>,
    txn_type: TransactionType,
) -> HashMap<String, f64> {
    let mut result: HashMap<String, f64> = HashMap::new();
    for txn in transactions.iter().filter(|t| t.txn_type() == txn_type) {
        *result.entry(payment_type_bucket(txn, index)).or_insert(0.0) += txn.amount;
    }
    result
}

/// Net holdings per account, regrouped by account kind and currency.
///
/// Goal earmarks move no money and are skipped; balances on accounts that
/// no longer exist land in the "Other" / default-currency buckets.
pub fn compute_holdings(transactions: &[Transaction], index: &SnapshotIndex<'_>) -> Holdings {
    let mut by_account: HashMap<&str, f64> = HashMap::new();
    for txn in transactions {
        match &txn.kind {
            TransactionKind::Income { account_id, .. } => {
                *by_account.entry(account_id).or_insert(0.0) += txn.amount;
            }
            TransactionKind::Expense { account_id, .. } => {
                *by_account.entry(account_id).or_insert(0.0) -= txn.amount;
            }
            TransactionKind::Transfer {
                from_account_id,
                to_account_id,
                to_goal_id,
                ..
            } => {
                if to_goal_id.is_some() {
                    continue;
                }
                *by_account.entry(from_account_id).or_insert(0.0) -= txn.amount;
                *by_account.entry(to_account_id).or_insert(0.0) += txn.amount;
            }
        }
    }

    let mut holdings = Holdings::default();
    for (account_id, amount) in by_account {
        let account = index.accounts.get(account_id);
        let place = account
            .map(|a| a.kind.label())
            .unwrap_or_else(|| AccountKind::Other.label());
        let currency = account
            .map(|a| a.currency.as_str())
            .unwrap_or(DEFAULT_CURRENCY);
        *holdings.by_place.entry(place.to_string()).or_insert(0.0) += amount;
        *holdings
            .by_currency
            .entry(currency.to_string())
            .or_insert(0.0) += amount;
    }
    holdings
}

/// Cumulative income-minus-expense series, one point per transaction in
/// date order. Transfers move nothing overall but still emit a point.
pub fn compute_trend(transactions: &[Transaction]) -> Vec<TrendPoint> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut balance = 0.0;
    sorted
        .into_iter()
        .map(|txn| {
            match txn.txn_type() {
                TransactionType::Income => balance += txn.amount,
                TransactionType::Expense => balance -= txn.amount,
                TransactionType::Transfer => {}
            }
            TrendPoint {
                date: txn.date,
                balance,
            }
        })
        .collect()
}
