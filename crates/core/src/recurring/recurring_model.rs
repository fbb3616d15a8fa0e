//! Recurring rule domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::utils::date_utils::{next_month_day, next_week, next_year_day};
use crate::utils::serde_utils::{opt_id, opt_text};

/// How often a rule materializes an occurrence.
///
/// Values outside the supported set (older exports carried things like
/// `annual` before import normalization) fall into `Unknown`, which keeps
/// the rule visible but inert: it never advances and never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    #[default]
    Monthly,
    Yearly,
    #[serde(other)]
    Unknown,
}

/// Type-dependent fields of a recurring rule, mirroring the transaction
/// shapes it materializes into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecurringKind {
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
        #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
        to_goal_id: Option<String>,
    },
}

/// Domain model representing a recurring rule.
///
/// `last_applied` is the rule's cursor: the date of the most recently
/// materialized occurrence. A rule with neither cursor nor `start_date` has
/// no anchor and is skipped by the expansion pass (it can still be executed
/// on demand).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    pub id: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    /// Nominal day-of-month for monthly stepping; clamped to short months.
    #[serde(default = "default_day")]
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_applied: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub kind: RecurringKind,
}

fn default_day() -> u32 {
    1
}

impl RecurringRule {
    /// The date the stepping loop advances from.
    pub fn anchor(&self) -> Option<NaiveDate> {
        self.last_applied.or(self.start_date)
    }

    /// The occurrence after `from`, or `None` for `Unknown` frequencies.
    pub fn next_due(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self.frequency {
            Frequency::Weekly => Some(next_week(from)),
            Frequency::Monthly => next_month_day(from, self.day.max(1)),
            Frequency::Yearly => next_year_day(from),
            Frequency::Unknown => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Recurring rule id cannot be empty".to_string(),
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
        if !(1..=31).contains(&self.day) {
            return Err(ValidationError::InvalidInput(format!(
                "Day of month must be between 1 and 31 (got {})",
                self.day
            )));
        }
        match &self.kind {
            RecurringKind::Income { account_id, .. }
            | RecurringKind::Expense { account_id, .. } => {
                if account_id.trim().is_empty() {
                    return Err(ValidationError::InvalidInput(
                        "Recurring rule must reference an account".to_string(),
                    ));
                }
            }
            RecurringKind::Transfer {
                from_account_id,
                to_account_id,
                ..
            } => {
                if from_account_id.trim().is_empty() || to_account_id.trim().is_empty() {
                    return Err(ValidationError::InvalidInput(
                        "Recurring transfer requires both source and destination".to_string(),
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
