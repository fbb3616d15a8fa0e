//! Available-balance computation over a transaction list.
//!
//! Goal-earmark transfers never move a raw balance: the money is already
//! sitting in the destination account, the earmark only reserves it inside
//! the goal's counter. Both folds here skip earmark legs entirely.

use crate::accounts::Account;
use crate::transactions::{Transaction, TransactionKind};

fn matches_method(txn_method: Option<&str>, wanted: Option<&str>, shared: bool) -> bool {
    shared || txn_method == wanted
}

/// Balance of `(account_id, method)` over `transactions`.
///
/// When the account carries the `shared_balance` flag, the method id is
/// ignored and all of the account's legs pool into one balance.
pub fn balance_on(
    transactions: &[Transaction],
    accounts: &[Account],
    account_id: &str,
    method: Option<&str>,
) -> f64 {
    let shared = accounts
        .iter()
        .find(|a| a.id == account_id)
        .map(|a| a.shared_balance)
        .unwrap_or(false);

    let mut balance = 0.0;
    for txn in transactions {
        if txn.goal_earmark().is_some() {
            continue;
        }
        match &txn.kind {
            TransactionKind::Income {
                account_id: acc,
                method_id,
                ..
            } => {
                if acc == account_id && matches_method(method_id.as_deref(), method, shared) {
                    balance += txn.amount;
                }
            }
            TransactionKind::Expense {
                account_id: acc,
                method_id,
            } => {
                if acc == account_id && matches_method(method_id.as_deref(), method, shared) {
                    balance -= txn.amount;
                }
            }
            TransactionKind::Transfer {
                from_account_id,
                from_method_id,
                to_account_id,
                to_method_id,
                ..
            } => {
                if from_account_id == account_id
                    && matches_method(from_method_id.as_deref(), method, shared)
                {
                    balance -= txn.amount;
                }
                if to_account_id == account_id
                    && matches_method(to_method_id.as_deref(), method, shared)
                {
                    balance += txn.amount;
                }
            }
        }
    }
    balance
}

/// Account-wide balance ignoring methods, used for goal capacity checks.
pub fn account_balance(transactions: &[Transaction], account_id: &str) -> f64 {
    let mut balance = 0.0;
    for txn in transactions {
        if txn.goal_earmark().is_some() {
            continue;
        }
        match &txn.kind {
            TransactionKind::Income {
                account_id: acc, ..
            } => {
                if acc == account_id {
                    balance += txn.amount;
                }
            }
            TransactionKind::Expense {
                account_id: acc, ..
            } => {
                if acc == account_id {
                    balance -= txn.amount;
                }
            }
            TransactionKind::Transfer {
                from_account_id,
                to_account_id,
                ..
            } => {
                if from_account_id == account_id {
                    balance -= txn.amount;
                }
                if to_account_id == account_id {
                    balance += txn.amount;
                }
            }
        }
    }
    balance
}
