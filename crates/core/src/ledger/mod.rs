//! Ledger module - balance computation shared by the recurring engine and
//! the validated transaction entry path.

mod balances;

pub use balances::{account_balance, balance_on};
