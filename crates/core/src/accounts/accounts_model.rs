//! Account ("bank") domain models.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CURRENCY;
use crate::errors::ValidationError;

/// Kind of an account - determines which payment method types it may hold
/// and how its balance is grouped on the holdings charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Bank,
    WalletPhysical,
    WalletOnline,
    Crypto,
    Piggy,
    #[default]
    #[serde(other)]
    Other,
}

impl AccountKind {
    /// Friendly label used by the holdings-by-place chart.
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Bank => "Bank",
            AccountKind::WalletPhysical => "Wallet (Physical)",
            AccountKind::WalletOnline => "Wallet (Online)",
            AccountKind::Crypto => "Crypto",
            AccountKind::Piggy => "Piggy",
            AccountKind::Other => "Other",
        }
    }
}

/// Domain model representing an account.
///
/// Serialized under the legacy collection name `banks` in the snapshot
/// document; individual fields keep the original export names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub colour: String,
    /// When true, all payment methods under this account draw from one
    /// pooled balance; per-method balance checks ignore the method id.
    #[serde(default)]
    pub shared_balance: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Account {
    /// Validates the account record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Account id cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Account currency cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
