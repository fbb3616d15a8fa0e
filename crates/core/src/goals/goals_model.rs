//! Savings goal domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Domain model representing a savings goal.
///
/// `current` is a running counter maintained by goal-earmark transfers; it
/// is never derived by re-scanning the transaction log. Every code path
/// that creates or deletes a goal-bound transfer must keep the two
/// consistent (see the `transactions` and `recurring` modules).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub colour: String,
    /// Account where the earmarked funds accumulate.
    pub account_id: String,
    pub target: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

impl Goal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Goal id cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Goal name cannot be empty".to_string(),
            ));
        }
        if self.account_id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Goal must reference an account".to_string(),
            ));
        }
        if self.target < 0.0 {
            return Err(ValidationError::NegativeAmount(self.target));
        }
        if self.current < 0.0 {
            return Err(ValidationError::NegativeAmount(self.current));
        }
        Ok(())
    }

    /// Completion in percent, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.current / self.target * 100.0).min(100.0)
    }
}
