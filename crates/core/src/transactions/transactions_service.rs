//! Validated transaction entry and removal paths.
//!
//! These are the user-facing counterparts of the recurring engine's
//! materialization step: the same funds and goal-capacity constraints, but
//! violations surface as [`ValidationError`]s instead of silently pausing a
//! rule. No partial state is ever produced; a failed check leaves the
//! snapshot untouched.

use log::debug;

use crate::errors::ValidationError;
use crate::ledger::{account_balance, balance_on};
use crate::snapshot::Snapshot;
use crate::transactions::{Transaction, TransactionKind};
use crate::Result;

/// Human-readable "where" for insufficient-funds messages, e.g.
/// `Main Bank · Visa`.
fn location_label(snapshot: &Snapshot, account_id: &str, method: Option<&str>) -> String {
    let account_name = snapshot
        .account(account_id)
        .map(|a| a.name.as_str())
        .unwrap_or(account_id);
    match method.and_then(|id| snapshot.method(id)) {
        Some(m) => format!("{} · {}", account_name, m.name),
        None => account_name.to_string(),
    }
}

fn check_funds(
    snapshot: &Snapshot,
    account_id: &str,
    method: Option<&str>,
    required: f64,
) -> Result<()> {
    let available = balance_on(&snapshot.transactions, &snapshot.accounts, account_id, method);
    if available < required {
        return Err(ValidationError::InsufficientFunds {
            available,
            required,
            currency: snapshot.account_currency(account_id),
            location: location_label(snapshot, account_id, method),
        }
        .into());
    }
    Ok(())
}

fn check_goal_deposit(snapshot: &Snapshot, goal_id: &str, to_account_id: &str, amount: f64) -> Result<()> {
    let goal = snapshot
        .goal(goal_id)
        .ok_or_else(|| ValidationError::UnknownGoal(goal_id.to_string()))?;
    if goal.account_id != to_account_id {
        return Err(ValidationError::GoalAccountMismatch {
            goal_id: goal_id.to_string(),
            account_id: to_account_id.to_string(),
        }
        .into());
    }
    // Only funds actually sitting unearmarked in the destination account may
    // be reserved into the goal.
    let destination_available = account_balance(&snapshot.transactions, to_account_id);
    if goal.current + amount > destination_available {
        return Err(ValidationError::GoalCapacityExceeded {
            goal_id: goal_id.to_string(),
            available: destination_available,
            required: goal.current + amount,
        }
        .into());
    }
    Ok(())
}

/// Checks a transaction against the snapshot without mutating anything:
/// shape validation, referential integrity, funds availability, and goal
/// capacity for earmark transfers.
pub fn check_transaction(snapshot: &Snapshot, transaction: &Transaction) -> Result<()> {
    transaction.validate()?;
    match &transaction.kind {
        TransactionKind::Income {
            account_id,
            method_id,
            ..
        } => {
            snapshot.check_account_exists(account_id)?;
            snapshot.check_method_ownership(account_id, method_id.as_deref())?;
        }
        TransactionKind::Expense {
            account_id,
            method_id,
        } => {
            snapshot.check_account_exists(account_id)?;
            snapshot.check_method_ownership(account_id, method_id.as_deref())?;
            check_funds(snapshot, account_id, method_id.as_deref(), transaction.amount)?;
        }
        TransactionKind::Transfer {
            from_account_id,
            from_method_id,
            to_account_id,
            to_method_id,
            to_goal_id,
        } => {
            snapshot.check_account_exists(from_account_id)?;
            snapshot.check_account_exists(to_account_id)?;
            snapshot.check_method_ownership(from_account_id, from_method_id.as_deref())?;
            check_funds(
                snapshot,
                from_account_id,
                from_method_id.as_deref(),
                transaction.amount,
            )?;
            match to_goal_id {
                Some(goal_id) => {
                    check_goal_deposit(snapshot, goal_id, to_account_id, transaction.amount)?;
                }
                None => {
                    snapshot.check_method_ownership(to_account_id, to_method_id.as_deref())?;
                }
            }
        }
    }
    Ok(())
}

/// Validates and appends a transaction, returning the updated snapshot.
///
/// Goal-earmark transfers also bump the target goal's `current` counter,
/// keeping it consistent with the transaction log.
pub fn apply_transaction(snapshot: &Snapshot, transaction: Transaction) -> Result<Snapshot> {
    check_transaction(snapshot, &transaction)?;
    let mut next = snapshot.clone();
    if let Some(goal_id) = transaction.goal_earmark() {
        if let Some(goal) = next.goals.iter_mut().find(|g| g.id == goal_id) {
            goal.current += transaction.amount;
            debug!(
                "earmarked {:.2} into goal {} (now {:.2})",
                transaction.amount, goal.id, goal.current
            );
        }
    }
    next.transactions.push(transaction);
    Ok(next)
}

/// Removes a transaction by id, reversing any goal earmark it carried.
pub fn delete_transaction(snapshot: &Snapshot, id: &str) -> Result<Snapshot> {
    let position = snapshot
        .transactions
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| ValidationError::UnknownTransaction(id.to_string()))?;
    let mut next = snapshot.clone();
    let removed = next.transactions.remove(position);
    if let Some(goal_id) = removed.goal_earmark() {
        if let Some(goal) = next.goals.iter_mut().find(|g| g.id == goal_id) {
            goal.current = (goal.current - removed.amount).max(0.0);
        }
    }
    Ok(next)
}
