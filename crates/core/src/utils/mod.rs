//! Shared helpers: calendar stepping and snapshot-boundary serde normalizers.

pub mod date_utils;
pub mod serde_utils;

use uuid::Uuid;

/// Generates a fresh id for records created inside the core
/// (materialized transactions, import-synthesized entities).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
