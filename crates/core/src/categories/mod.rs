//! Categories module - domain models.

mod categories_model;

pub use categories_model::{Categories, Category, CategoryKind};
