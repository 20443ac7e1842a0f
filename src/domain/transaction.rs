//! Immutable ledger postings.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a posting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Signed multiplier applied when netting amounts.
    pub fn sign(self) -> Decimal {
        match self {
            TransactionKind::Income => Decimal::ONE,
            TransactionKind::Expense => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        };
        f.write_str(label)
    }
}

/// A posted ledger entry. Once appended to a wallet it is never changed or removed.
///
/// Amount positivity is checked by the ledger service before construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub time: NaiveDateTime,
}

impl Transaction {
    /// Builds a transaction, defaulting the description to empty and the timestamp to now.
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        category: impl Into<String>,
        description: Option<String>,
        time: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category: category.into(),
            description: description.unwrap_or_default(),
            time: time.unwrap_or_else(|| Local::now().naive_local()),
        }
    }

    /// Amount with the sign implied by the kind (income positive, expense negative).
    pub fn signed_amount(&self) -> Decimal {
        self.amount * self.kind.sign()
    }
}
