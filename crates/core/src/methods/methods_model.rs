//! Payment method domain models.

use serde::{Deserialize, Serialize};

use crate::accounts::AccountKind;
use crate::errors::ValidationError;

/// Kind of a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Card,
    Cash,
    Wallet,
    Crypto,
    Bank,
    #[default]
    #[serde(other)]
    Other,
}

impl MethodKind {
    /// Friendly label used by the by-payment-type charts.
    pub fn label(&self) -> &'static str {
        match self {
            MethodKind::Card => "Card",
            MethodKind::Cash => "Cash",
            MethodKind::Wallet => "Wallet",
            MethodKind::Crypto => "Crypto",
            MethodKind::Bank => "Bank",
            MethodKind::Other => "Other",
        }
    }

    /// Whether this method kind may be attached to an account of `kind`.
    ///
    /// Bank accounts take cards and bank transfers, physical wallets take
    /// cash, online wallets take wallet methods, crypto accounts take crypto
    /// methods, piggy banks take no methods at all.
    pub fn allowed_for(&self, kind: AccountKind) -> bool {
        match kind {
            AccountKind::Bank => matches!(self, MethodKind::Card | MethodKind::Bank),
            AccountKind::WalletPhysical => matches!(self, MethodKind::Cash),
            AccountKind::WalletOnline => matches!(self, MethodKind::Wallet),
            AccountKind::Crypto => matches!(self, MethodKind::Crypto),
            AccountKind::Piggy => false,
            AccountKind::Other => true,
        }
    }
}

/// Domain model representing a payment method. A method never exists
/// without an owning account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: MethodKind,
    pub name: String,
    pub account_id: String,
    #[serde(default)]
    pub colour: String,
}

impl PaymentMethod {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Payment method id cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Payment method name cannot be empty".to_string(),
            ));
        }
        if self.account_id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Payment method must reference an account".to_string(),
            ));
        }
        Ok(())
    }
}
