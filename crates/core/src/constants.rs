/// Schema version written to exported snapshot documents.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Default currency label for accounts and new snapshots.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Safety cap on occurrences a single rule may materialize per expansion call.
pub const MAX_OCCURRENCES_PER_RULE: usize = 120;

/// Bucket label used when a category or payment method cannot be resolved.
pub const OTHER_BUCKET: &str = "Other";
