//! Chart aggregation output models.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Net holdings grouped two ways for the holdings pie charts.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holdings {
    /// Keyed by friendly account-kind label ("Bank", "Wallet (Physical)", ...).
    pub by_place: HashMap<String, f64>,
    /// Keyed by account currency.
    pub by_currency: HashMap<String, f64>,
}

/// One point of the cumulative balance trend line.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub balance: f64,
}
