//! Materialization engine for recurring rules.
//!
//! `expand_due` walks every anchored rule from its cursor up to `today`,
//! generating concrete transactions. Nothing here touches the snapshot it
//! is given: the outcome is returned as an [`Expansion`] that the caller
//! merges with [`Expansion::apply`]. Running the pass twice against the
//! same snapshot and `today` therefore yields the same result, and the
//! second pass is empty once the first has been applied.
//!
//! Funds checks run against a running ledger of stored transactions plus
//! everything generated earlier in the same pass, so a materialized income
//! can fund an expense due later the same day. A rule whose check fails
//! stops at its current cursor; it resumes from there on a later pass once
//! funds exist. Stalls are expected operating conditions, not errors.

use chrono::NaiveDate;
use log::{debug, warn};

use crate::constants::MAX_OCCURRENCES_PER_RULE;
use crate::errors::ValidationError;
use crate::goals::Goal;
use crate::ledger::{account_balance, balance_on};
use crate::recurring::{RecurringKind, RecurringRule};
use crate::snapshot::Snapshot;
use crate::transactions::{check_transaction, Transaction, TransactionKind};
use crate::utils::new_id;
use crate::Result;

/// Outcome of a materialization pass.
///
/// `updated_rules` and `updated_goals` are complete replacement lists
/// (cursors advanced, earmark counters bumped); `new_transactions` are
/// appended to the log.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub new_transactions: Vec<Transaction>,
    pub updated_rules: Vec<RecurringRule>,
    pub updated_goals: Vec<Goal>,
}

impl Expansion {
    pub fn is_empty(&self) -> bool {
        self.new_transactions.is_empty()
    }

    /// Merges this expansion into `snapshot`, consuming both.
    pub fn apply(self, mut snapshot: Snapshot) -> Snapshot {
        if self.is_empty() {
            return snapshot;
        }
        snapshot.transactions.extend(self.new_transactions);
        snapshot.recurring_rules = self.updated_rules;
        snapshot.goals = self.updated_goals;
        snapshot
    }
}

/// Builds the concrete transaction for one occurrence of `rule` on `date`.
///
/// Transfers carry no category, matching manual entry; every materialized
/// transaction backlinks its rule through `recurring_id`.
fn materialize(rule: &RecurringRule, date: NaiveDate) -> Transaction {
    let is_transfer = matches!(rule.kind, RecurringKind::Transfer { .. });
    Transaction {
        id: new_id(),
        amount: rule.amount,
        date,
        category: if is_transfer { None } else { rule.category.clone() },
        category_id: if is_transfer { None } else { rule.category_id.clone() },
        note: rule.note.clone(),
        recurring_id: Some(rule.id.clone()),
        kind: match &rule.kind {
            RecurringKind::Income {
                account_id,
                method_id,
                source,
            } => TransactionKind::Income {
                account_id: account_id.clone(),
                method_id: method_id.clone(),
                source: source.clone(),
            },
            RecurringKind::Expense {
                account_id,
                method_id,
            } => TransactionKind::Expense {
                account_id: account_id.clone(),
                method_id: method_id.clone(),
            },
            RecurringKind::Transfer {
                from_account_id,
                from_method_id,
                to_account_id,
                to_method_id,
                to_goal_id,
            } => TransactionKind::Transfer {
                from_account_id: from_account_id.clone(),
                from_method_id: from_method_id.clone(),
                to_account_id: to_account_id.clone(),
                to_method_id: to_method_id.clone(),
                to_goal_id: to_goal_id.clone(),
            },
        },
    }
}

/// Whether one occurrence of `rule` can go through against `ledger`, and
/// which goal (if any) it earmarks into.
///
/// Income always passes. Expense and the transfer source leg need the
/// amount available on their account/method; goal-bound transfers further
/// require the goal to live on the destination account and the bumped
/// counter to stay within the destination's unearmarked balance.
fn occurrence_clears<'a>(
    rule: &RecurringRule,
    ledger: &[Transaction],
    snapshot: &Snapshot,
    goals: &'a mut [Goal],
) -> Option<Option<&'a mut Goal>> {
    match &rule.kind {
        RecurringKind::Income { .. } => Some(None),
        RecurringKind::Expense {
            account_id,
            method_id,
        } => {
            let available = balance_on(ledger, &snapshot.accounts, account_id, method_id.as_deref());
            if available < rule.amount {
                debug!(
                    "recurring rule {} stalled: {:.2} available on {}, need {:.2}",
                    rule.id, available, account_id, rule.amount
                );
                return None;
            }
            Some(None)
        }
        RecurringKind::Transfer {
            from_account_id,
            from_method_id,
            to_account_id,
            to_goal_id,
            ..
        } => {
            let available = balance_on(
                ledger,
                &snapshot.accounts,
                from_account_id,
                from_method_id.as_deref(),
            );
            if available < rule.amount {
                debug!(
                    "recurring rule {} stalled: {:.2} available on {}, need {:.2}",
                    rule.id, available, from_account_id, rule.amount
                );
                return None;
            }
            match to_goal_id {
                None => Some(None),
                Some(goal_id) => {
                    let destination_available = account_balance(ledger, to_account_id);
                    let goal = goals.iter_mut().find(|g| g.id == *goal_id)?;
                    if goal.account_id != *to_account_id {
                        debug!(
                            "recurring rule {} stalled: goal {} is not bound to account {}",
                            rule.id, goal_id, to_account_id
                        );
                        return None;
                    }
                    if goal.current + rule.amount > destination_available {
                        debug!(
                            "recurring rule {} stalled: goal {} at {:.2}, destination holds {:.2}",
                            rule.id, goal_id, goal.current, destination_available
                        );
                        return None;
                    }
                    Some(Some(goal))
                }
            }
        }
    }
}

/// Materializes every occurrence due on or before `today`.
///
/// Rules without an anchor (`last_applied` or `start_date`) and rules with
/// an unsupported frequency are skipped. A single rule generates at most
/// [`MAX_OCCURRENCES_PER_RULE`] occurrences per pass.
pub fn expand_due(snapshot: &Snapshot, today: NaiveDate) -> Expansion {
    let mut rules = snapshot.recurring_rules.clone();
    let mut goals = snapshot.goals.clone();
    let mut new_transactions: Vec<Transaction> = Vec::new();
    // Running ledger: stored transactions plus this pass's output so far.
    let mut ledger = snapshot.transactions.clone();

    for rule in rules.iter_mut() {
        let Some(mut cursor) = rule.anchor() else {
            continue;
        };
        let mut generated = 0usize;
        while let Some(next) = rule.next_due(cursor) {
            if next > today {
                break;
            }
            let Some(earmarked_goal) = occurrence_clears(rule, &ledger, snapshot, &mut goals)
            else {
                break;
            };
            let txn = materialize(rule, next);
            if let Some(goal) = earmarked_goal {
                goal.current += rule.amount;
            }
            ledger.push(txn.clone());
            new_transactions.push(txn);
            rule.last_applied = Some(next);
            cursor = next;
            generated += 1;
            if generated >= MAX_OCCURRENCES_PER_RULE {
                warn!(
                    "recurring rule {} hit the {} occurrence cap in one pass",
                    rule.id, MAX_OCCURRENCES_PER_RULE
                );
                break;
            }
        }
    }

    if new_transactions.is_empty() {
        return Expansion::default();
    }
    Expansion {
        new_transactions,
        updated_rules: rules,
        updated_goals: goals,
    }
}

/// Materializes a single occurrence of `rule_id` dated `today`, on demand.
///
/// Unlike the expansion pass this is a user-facing action: failed funds or
/// goal checks surface as validation errors instead of a silent stall, and
/// the rule's cursor is left untouched.
pub fn execute_now(snapshot: &Snapshot, rule_id: &str, today: NaiveDate) -> Result<Expansion> {
    let rule = snapshot
        .recurring_rules
        .iter()
        .find(|r| r.id == rule_id)
        .ok_or_else(|| ValidationError::UnknownRule(rule_id.to_string()))?;
    rule.validate()?;

    let txn = materialize(rule, today);
    check_transaction(snapshot, &txn)?;

    let mut goals = snapshot.goals.clone();
    if let Some(goal_id) = txn.goal_earmark() {
        if let Some(goal) = goals.iter_mut().find(|g| g.id == goal_id) {
            goal.current += txn.amount;
        }
    }
    Ok(Expansion {
        new_transactions: vec![txn],
        updated_rules: snapshot.recurring_rules.clone(),
        updated_goals: goals,
    })
}
