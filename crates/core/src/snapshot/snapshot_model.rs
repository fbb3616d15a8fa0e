//! The snapshot document: every piece of financial state in one value.
//!
//! All engine operations take a `&Snapshot` and return new values; nothing
//! in this crate holds hidden state between calls. Record management
//! follows the same style: additions and removals validate first, then
//! return an updated copy.
//!
//! Removal policy: an account cannot go while transactions, rules or goals
//! still reference it (removing it cascades to its payment methods);
//! methods and goals are likewise blocked while referenced. Categories and
//! rules delete freely, since transactions keep working with a dangling
//! category (it buckets as "Other" on the charts).

use log::warn;
use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::categories::{Categories, Category, CategoryKind};
use crate::constants::{DEFAULT_CURRENCY, SNAPSHOT_VERSION};
use crate::errors::{SnapshotError, ValidationError};
use crate::goals::Goal;
use crate::methods::PaymentMethod;
use crate::recurring::{RecurringKind, RecurringRule};
use crate::transactions::{Transaction, TransactionKind};
use crate::Result;

/// The exported document, serialized with the original field names
/// (accounts live under the legacy key `banks`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_currency")]
    pub base_currency: String,
    #[serde(default, rename = "banks")]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub recurring_rules: Vec<RecurringRule>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            version: default_version(),
            base_currency: default_currency(),
            accounts: Vec::new(),
            payment_methods: Vec::new(),
            categories: Categories::default(),
            goals: Vec::new(),
            recurring_rules: Vec::new(),
            transactions: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Snapshot> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Malformed(e.to_string()).into())
    }

    // Lookups

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn method(&self, id: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn rule(&self, id: &str) -> Option<&RecurringRule> {
        self.recurring_rules.iter().find(|r| r.id == id)
    }

    pub fn account_currency(&self, id: &str) -> String {
        self.account(id)
            .map(|a| a.currency.clone())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }

    // Referential checks shared by the entry paths

    pub fn check_account_exists(&self, id: &str) -> Result<()> {
        if self.account(id).is_none() {
            return Err(ValidationError::UnknownAccount(id.to_string()).into());
        }
        Ok(())
    }

    /// A missing method is fine; a present one must exist and belong to
    /// `account_id`.
    pub fn check_method_ownership(&self, account_id: &str, method: Option<&str>) -> Result<()> {
        let Some(method_id) = method else {
            return Ok(());
        };
        let method = self
            .method(method_id)
            .ok_or_else(|| ValidationError::UnknownMethod(method_id.to_string()))?;
        if method.account_id != account_id {
            return Err(ValidationError::MethodAccountMismatch {
                method_id: method_id.to_string(),
                account_id: account_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Structural validation of the whole document.
    ///
    /// Configuration records must be internally consistent (unique ids,
    /// methods and goals bound to existing accounts). The method-kind
    /// matrix is a creation-time constraint only: imported legacy
    /// documents may carry combinations today's forms would refuse.
    /// Transactions referencing since-deleted records are tolerated with
    /// a warning: they are history, and the aggregations bucket them as
    /// "Other".
    pub fn validate(&self) -> Result<()> {
        for account in &self.accounts {
            account.validate()?;
            if self.accounts.iter().filter(|a| a.id == account.id).count() > 1 {
                return Err(SnapshotError::Invalid(format!(
                    "Duplicate account id: {}",
                    account.id
                ))
                .into());
            }
        }
        for method in &self.payment_methods {
            method.validate()?;
            if self.account(&method.account_id).is_none() {
                return Err(SnapshotError::Invalid(format!(
                    "Payment method {} references missing account {}",
                    method.id, method.account_id
                ))
                .into());
            }
        }
        for category in self.categories.income.iter().chain(&self.categories.expense) {
            category.validate()?;
        }
        for goal in &self.goals {
            goal.validate()?;
            if self.account(&goal.account_id).is_none() {
                return Err(SnapshotError::Invalid(format!(
                    "Goal {} references missing account {}",
                    goal.id, goal.account_id
                ))
                .into());
            }
        }
        for rule in &self.recurring_rules {
            rule.validate()?;
        }
        for txn in &self.transactions {
            txn.validate()?;
            for account_id in txn_account_ids(txn) {
                if self.account(account_id).is_none() {
                    warn!(
                        "transaction {} references missing account {}",
                        txn.id, account_id
                    );
                }
            }
        }
        Ok(())
    }

    // Record management

    pub fn add_account(&self, account: Account) -> Result<Snapshot> {
        account.validate()?;
        if self.account(&account.id).is_some() {
            return Err(
                SnapshotError::Invalid(format!("Duplicate account id: {}", account.id)).into(),
            );
        }
        let mut next = self.clone();
        next.accounts.push(account);
        Ok(next)
    }

    /// Removes an account and its payment methods. Blocked while any
    /// transaction, rule or goal still references the account.
    pub fn remove_account(&self, id: &str) -> Result<Snapshot> {
        self.check_account_exists(id)?;
        let referenced = self
            .transactions
            .iter()
            .any(|t| txn_account_ids(t).contains(&id))
            || self
                .recurring_rules
                .iter()
                .any(|r| rule_account_ids(r).contains(&id))
            || self.goals.iter().any(|g| g.account_id == id);
        if referenced {
            return Err(ValidationError::AccountInUse(id.to_string()).into());
        }
        let mut next = self.clone();
        next.accounts.retain(|a| a.id != id);
        next.payment_methods.retain(|m| m.account_id != id);
        Ok(next)
    }

    pub fn add_method(&self, method: PaymentMethod) -> Result<Snapshot> {
        method.validate()?;
        if self.method(&method.id).is_some() {
            return Err(
                SnapshotError::Invalid(format!("Duplicate method id: {}", method.id)).into(),
            );
        }
        let account = self
            .account(&method.account_id)
            .ok_or_else(|| ValidationError::UnknownAccount(method.account_id.clone()))?;
        if !method.kind.allowed_for(account.kind) {
            return Err(ValidationError::MethodTypeNotAllowed {
                method_kind: method.kind.label().to_string(),
                account_kind: account.kind.label().to_string(),
            }
            .into());
        }
        let mut next = self.clone();
        next.payment_methods.push(method);
        Ok(next)
    }

    pub fn remove_method(&self, id: &str) -> Result<Snapshot> {
        if self.method(id).is_none() {
            return Err(ValidationError::UnknownMethod(id.to_string()).into());
        }
        let referenced = self
            .transactions
            .iter()
            .any(|t| txn_method_ids(t).contains(&id))
            || self
                .recurring_rules
                .iter()
                .any(|r| rule_method_ids(r).contains(&id));
        if referenced {
            return Err(ValidationError::MethodInUse(id.to_string()).into());
        }
        let mut next = self.clone();
        next.payment_methods.retain(|m| m.id != id);
        Ok(next)
    }

    pub fn add_goal(&self, goal: Goal) -> Result<Snapshot> {
        goal.validate()?;
        self.check_account_exists(&goal.account_id)?;
        let mut next = self.clone();
        next.goals.push(goal);
        Ok(next)
    }

    /// Blocked while earmark transfers or goal-bound rules reference the
    /// goal, so the `current` counter never becomes unexplainable.
    pub fn remove_goal(&self, id: &str) -> Result<Snapshot> {
        if self.goal(id).is_none() {
            return Err(ValidationError::UnknownGoal(id.to_string()).into());
        }
        let referenced = self
            .transactions
            .iter()
            .any(|t| t.goal_earmark() == Some(id))
            || self.recurring_rules.iter().any(
                |r| matches!(&r.kind, RecurringKind::Transfer { to_goal_id: Some(g), .. } if g == id),
            );
        if referenced {
            return Err(ValidationError::GoalInUse(id.to_string()).into());
        }
        let mut next = self.clone();
        next.goals.retain(|g| g.id != id);
        Ok(next)
    }

    pub fn add_category(&self, kind: CategoryKind, category: Category) -> Result<Snapshot> {
        category.validate()?;
        if self.categories.contains_name(kind, &category.name) {
            return Err(ValidationError::DuplicateCategory(category.name).into());
        }
        let mut next = self.clone();
        next.categories.list_mut(kind).push(category);
        Ok(next)
    }

    pub fn remove_category(&self, kind: CategoryKind, id: &str) -> Result<Snapshot> {
        let mut next = self.clone();
        let list = next.categories.list_mut(kind);
        let before = list.len();
        list.retain(|c| c.id != id);
        if list.len() == before {
            return Err(ValidationError::InvalidInput(format!("Unknown category: {id}")).into());
        }
        Ok(next)
    }

    pub fn add_rule(&self, rule: RecurringRule) -> Result<Snapshot> {
        rule.validate()?;
        match &rule.kind {
            RecurringKind::Income {
                account_id,
                method_id,
                ..
            }
            | RecurringKind::Expense {
                account_id,
                method_id,
            } => {
                self.check_account_exists(account_id)?;
                self.check_method_ownership(account_id, method_id.as_deref())?;
            }
            RecurringKind::Transfer {
                from_account_id,
                from_method_id,
                to_account_id,
                to_method_id,
                to_goal_id,
            } => {
                self.check_account_exists(from_account_id)?;
                self.check_account_exists(to_account_id)?;
                self.check_method_ownership(from_account_id, from_method_id.as_deref())?;
                match to_goal_id {
                    Some(goal_id) => {
                        let goal = self
                            .goal(goal_id)
                            .ok_or_else(|| ValidationError::UnknownGoal(goal_id.clone()))?;
                        if goal.account_id != *to_account_id {
                            return Err(ValidationError::GoalAccountMismatch {
                                goal_id: goal_id.clone(),
                                account_id: to_account_id.clone(),
                            }
                            .into());
                        }
                    }
                    None => {
                        self.check_method_ownership(to_account_id, to_method_id.as_deref())?;
                    }
                }
            }
        }
        let mut next = self.clone();
        next.recurring_rules.push(rule);
        Ok(next)
    }

    pub fn remove_rule(&self, id: &str) -> Result<Snapshot> {
        if self.rule(id).is_none() {
            return Err(ValidationError::UnknownRule(id.to_string()).into());
        }
        let mut next = self.clone();
        next.recurring_rules.retain(|r| r.id != id);
        Ok(next)
    }
}

fn txn_account_ids(txn: &Transaction) -> Vec<&str> {
    match &txn.kind {
        TransactionKind::Income { account_id, .. }
        | TransactionKind::Expense { account_id, .. } => vec![account_id],
        TransactionKind::Transfer {
            from_account_id,
            to_account_id,
            ..
        } => vec![from_account_id, to_account_id],
    }
}

fn txn_method_ids(txn: &Transaction) -> Vec<&str> {
    match &txn.kind {
        TransactionKind::Income { method_id, .. } | TransactionKind::Expense { method_id, .. } => {
            method_id.as_deref().into_iter().collect()
        }
        TransactionKind::Transfer {
            from_method_id,
            to_method_id,
            ..
        } => from_method_id
            .as_deref()
            .into_iter()
            .chain(to_method_id.as_deref())
            .collect(),
    }
}

fn rule_account_ids(rule: &RecurringRule) -> Vec<&str> {
    match &rule.kind {
        RecurringKind::Income { account_id, .. } | RecurringKind::Expense { account_id, .. } => {
            vec![account_id]
        }
        RecurringKind::Transfer {
            from_account_id,
            to_account_id,
            ..
        } => vec![from_account_id, to_account_id],
    }
}

fn rule_method_ids(rule: &RecurringRule) -> Vec<&str> {
    match &rule.kind {
        RecurringKind::Income { method_id, .. } | RecurringKind::Expense { method_id, .. } => {
            method_id.as_deref().into_iter().collect()
        }
        RecurringKind::Transfer {
            from_method_id,
            to_method_id,
            ..
        } => from_method_id
            .as_deref()
            .into_iter()
            .chain(to_method_id.as_deref())
            .collect(),
    }
}
