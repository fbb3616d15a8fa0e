//! Serde helpers that normalize legacy field sentinels at the snapshot boundary.
//!
//! Older page scripts persisted "no payment method" as `""` or `"none"` and
//! empty descriptive fields as `""`. The core carries a single explicit
//! `Option` instead, so these map to `None` on the way in.

use serde::{Deserialize, Deserializer};

/// Deserializes an optional id field, treating `""` and `"none"` as absent.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty() && s != "none"))
}

/// Deserializes an optional text field, treating `""` as absent.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
