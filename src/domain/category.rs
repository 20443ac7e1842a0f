//! Domain types representing budget categories.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, LedgerResult};

/// Named bucket that transactions are tagged with, carrying an optional spending budget.
///
/// A budget of zero means "no budget"; budget checks only apply when the budget is positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    name: String,
    #[serde(with = "rust_decimal::serde::str")]
    budget: Decimal,
}

impl Category {
    /// Creates a category with a zero budget. Blank names are rejected.
    pub fn new(name: impl Into<String>) -> LedgerResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidArgument(
                "category name must not be blank".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            budget: Decimal::ZERO,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    /// Assigns the budget, clamping negative values to zero.
    pub fn set_budget(&mut self, amount: Decimal) {
        self.budget = amount.max(Decimal::ZERO);
    }

    pub fn has_budget(&self) -> bool {
        self.budget > Decimal::ZERO
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (budget={})", self.name, self.budget)
    }
}
