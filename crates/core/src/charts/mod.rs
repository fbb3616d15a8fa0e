//! Charts module - read-only aggregations feeding the dashboard charts.

mod charts_model;
mod charts_service;


pub use charts_model::{Holdings, TrendPoint};
pub use charts_service::{
    aggregate_by_category, aggregate_by_payment_type, compute_holdings, compute_trend,
    SnapshotIndex,
};
