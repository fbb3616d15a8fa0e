//! Payment methods module - domain models.

mod methods_model;

pub use methods_model::{MethodKind, PaymentMethod};
