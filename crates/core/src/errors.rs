//! Core error types for the Talous engine.
//!
//! The core raises only validation and snapshot-decoding errors; an
//! insufficient-funds condition during recurring expansion is not an error
//! (the rule simply stops advancing, see the `recurring` module).

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the snapshot engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Snapshot document error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Validation failures surfaced before any mutation takes place.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(f64),

    #[error("Transfer blocked: source and destination cannot be the same")]
    SameAccountTransfer,

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),

    #[error("Unknown goal: {0}")]
    UnknownGoal(String),

    #[error("Unknown recurring rule: {0}")]
    UnknownRule(String),

    #[error("Unknown transaction: {0}")]
    UnknownTransaction(String),

    #[error("Payment method {method_id} does not belong to account {account_id}")]
    MethodAccountMismatch {
        method_id: String,
        account_id: String,
    },

    #[error("Method type '{method_kind}' is not allowed on a '{account_kind}' account")]
    MethodTypeNotAllowed {
        method_kind: String,
        account_kind: String,
    },

    #[error(
        "Insufficient funds: {available:.2} {currency} available in {location}; \
         need {required:.2} {currency}"
    )]
    InsufficientFunds {
        available: f64,
        required: f64,
        currency: String,
        location: String,
    },

    #[error("Goal '{goal_id}' is not bound to destination account '{account_id}'")]
    GoalAccountMismatch {
        goal_id: String,
        account_id: String,
    },

    #[error(
        "Goal deposit blocked: only {available:.2} unearmarked in the destination \
         account; goal '{goal_id}' would hold {required:.2}"
    )]
    GoalCapacityExceeded {
        goal_id: String,
        available: f64,
        required: f64,
    },

    #[error("Account {0} is still referenced and cannot be deleted")]
    AccountInUse(String),

    #[error("Payment method {0} is still referenced and cannot be deleted")]
    MethodInUse(String),

    #[error("Goal {0} is still referenced and cannot be deleted")]
    GoalInUse(String),

    #[error("Category name '{0}' already exists")]
    DuplicateCategory(String),
}

/// Errors decoding or structurally validating a snapshot document.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The document is not valid JSON at all.
    #[error("Malformed snapshot document: {0}")]
    Malformed(String),

    /// The document parsed but violates a structural invariant.
    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}
