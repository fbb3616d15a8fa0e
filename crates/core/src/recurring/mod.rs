//! Recurring rules module - rule models and the materialization engine.

mod recurring_model;
mod recurring_service;

#[cfg(test)]
mod recurring_service_tests;

pub use recurring_model::{Frequency, RecurringKind, RecurringRule};
pub use recurring_service::{execute_now, expand_due, Expansion};
