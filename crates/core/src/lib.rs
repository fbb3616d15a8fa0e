//! Talous Core - Domain entities and the snapshot engines.
//!
//! This crate contains the core business logic for Talous: the recurring
//! transaction engine and the chart aggregation engine, both pure functions
//! over an explicit financial [`Snapshot`]. It performs no I/O; loading and
//! persisting the snapshot document is the host application's concern.

pub mod accounts;
pub mod categories;
pub mod charts;
pub mod constants;
pub mod errors;
pub mod goals;
pub mod ledger;
pub mod methods;
pub mod recurring;
pub mod snapshot;
pub mod transactions;
pub mod utils;

// Re-export the snapshot document type
pub use snapshot::Snapshot;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
