//! Transaction domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::utils::serde_utils::{opt_id, opt_text};

/// Discriminant of a transaction (and of a recurring rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

/// Type-dependent fields of a transaction, tagged by `type` in the
/// snapshot document exactly as the original export writes them.
///
/// A missing payment method is a single explicit `None`; the legacy `""`
/// and `"none"` sentinels are normalized away on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(rename_all = "camelCase")]
    Income {
        account_id: String,
        #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
        method_id: Option<String>,
        #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Expense {
        account_id: String,
        #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
        method_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Transfer {
        from_account_id: String,
        #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
        from_method_id: Option<String>,
        to_account_id: String,
        #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
        to_method_id: Option<String>,
        /// When set, this transfer is a goal earmark: the amount moves into
        /// the goal's `current` counter and must not count towards the
        /// destination account's spendable balance.
        #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
        to_goal_id: Option<String>,
    },
}

/// Domain model representing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Magnitude in the account's currency; the sign is carried by the kind.
    pub amount: f64,
    pub date: NaiveDate,
    /// Legacy display-string category, kept for documents that predate
    /// id-based categories.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Id-based category reference; aggregation prefers this when present.
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Backlink to the recurring rule that materialized this transaction.
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn txn_type(&self) -> TransactionType {
        match self.kind {
            TransactionKind::Income { .. } => TransactionType::Income,
            TransactionKind::Expense { .. } => TransactionType::Expense,
            TransactionKind::Transfer { .. } => TransactionType::Transfer,
        }
    }

    /// The goal id when this transaction is a goal-earmark transfer.
    pub fn goal_earmark(&self) -> Option<&str> {
        match &self.kind {
            TransactionKind::Transfer { to_goal_id, .. } => to_goal_id.as_deref(),
            _ => None,
        }
    }

    /// The account/method pair of an income or expense leg.
    pub fn single_leg(&self) -> Option<(&str, Option<&str>)> {
        match &self.kind {
            TransactionKind::Income {
                account_id,
                method_id,
                ..
            }
            | TransactionKind::Expense {
                account_id,
                method_id,
            } => Some((account_id, method_id.as_deref())),
            TransactionKind::Transfer { .. } => None,
        }
    }

    /// Validates the shape of the transaction without consulting a snapshot.
    ///
    /// Amounts must be non-negative (a zero-amount transfer between distinct
    /// accounts is legal, if economically a no-op) and transfer endpoints
    /// must be present and distinct.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Transaction id cannot be empty".to_string(),
            ));
        }
        if !self.amount.is_finite() {
            return Err(ValidationError::InvalidInput(
                "Amount must be a finite number".to_string(),
            ));
        }
        if self.amount < 0.0 {
            return Err(ValidationError::NegativeAmount(self.amount));
        }
        match &self.kind {
            TransactionKind::Income { account_id, .. }
            | TransactionKind::Expense { account_id, .. } => {
                if account_id.trim().is_empty() {
                    return Err(ValidationError::InvalidInput(
                        "Transaction must reference an account".to_string(),
                    ));
                }
            }
            TransactionKind::Transfer {
                from_account_id,
                to_account_id,
                ..
            } => {
                if from_account_id.trim().is_empty() || to_account_id.trim().is_empty() {
                    return Err(ValidationError::InvalidInput(
                        "Transfer requires both source and destination".to_string(),
                    ));
                }
                if from_account_id == to_account_id {
                    return Err(ValidationError::SameAccountTransfer);
                }
            }
        }
        Ok(())
    }
}
