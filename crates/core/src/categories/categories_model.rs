//! Category domain models.
//!
//! Income and expense categories live in two independent lists; names must
//! be unique within a list but may repeat across the two.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Which of the two category lists a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// Domain model representing a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub colour: String,
}

impl Category {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Category id cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Category name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The two category lists of a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Categories {
    #[serde(default)]
    pub income: Vec<Category>,
    #[serde(default)]
    pub expense: Vec<Category>,
}

impl Categories {
    pub fn list(&self, kind: CategoryKind) -> &[Category] {
        match kind {
            CategoryKind::Income => &self.income,
            CategoryKind::Expense => &self.expense,
        }
    }

    pub fn list_mut(&mut self, kind: CategoryKind) -> &mut Vec<Category> {
        match kind {
            CategoryKind::Income => &mut self.income,
            CategoryKind::Expense => &mut self.expense,
        }
    }

    pub fn contains_name(&self, kind: CategoryKind, name: &str) -> bool {
        self.list(kind).iter().any(|c| c.name == name)
    }
}
