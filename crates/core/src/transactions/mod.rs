//! Transactions module - domain models and the validated entry paths.

mod transactions_model;
mod transactions_service;


pub use transactions_model::{Transaction, TransactionKind, TransactionType};
pub use transactions_service::{apply_transaction, check_transaction, delete_transaction};
