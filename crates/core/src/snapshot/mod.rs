//! Snapshot module - the complete financial document, its structural
//! validation, record management, legacy import adapters and the built-in
//! starter dataset.

mod legacy;
mod sample;
mod snapshot_model;

#[cfg(test)]
mod snapshot_tests;

pub use legacy::import_snapshot;
pub use snapshot_model::Snapshot;
