//! Per-user wallet: an append-only transaction log plus its category table.

use std::collections::{btree_map::Entry, BTreeMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::transaction::{Transaction, TransactionKind};
use crate::errors::LedgerResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet {
    pub id: Uuid,
    owner_login: String,
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    categories: BTreeMap<String, Category>,
}

impl Wallet {
    /// Creates an empty wallet for `owner_login`.
    pub fn new(owner_login: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_login: owner_login.into(),
            transactions: Vec::new(),
            categories: BTreeMap::new(),
        }
    }

    pub fn owner_login(&self) -> &str {
        &self.owner_login
    }

    /// Transactions in posting order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Categories keyed by name, iterated in ascending name order.
    pub fn categories(&self) -> &BTreeMap<String, Category> {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.categories.is_empty()
    }

    /// Inserts `category`, replacing nothing: callers check for duplicates first.
    pub(crate) fn insert_category(&mut self, category: Category) {
        self.categories
            .entry(category.name().to_string())
            .or_insert(category);
    }

    /// Returns the named category, creating it with a zero budget when absent.
    pub(crate) fn ensure_category(&mut self, name: &str) -> LedgerResult<&mut Category> {
        match self.categories.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(Category::new(name)?)),
        }
    }

    pub(crate) fn append(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Lifetime total of all postings of `kind`, saturating at `Decimal::MAX`.
    pub fn total(&self, kind: TransactionKind) -> Decimal {
        self.transactions
            .iter()
            .filter(|txn| txn.kind == kind)
            .fold(Decimal::ZERO, |acc, txn| acc.saturating_add(txn.amount))
    }

    /// Lifetime total of all postings of `kind`, or `None` when it does not fit in a `Decimal`.
    pub fn checked_total(&self, kind: TransactionKind) -> Option<Decimal> {
        self.transactions
            .iter()
            .filter(|txn| txn.kind == kind)
            .try_fold(Decimal::ZERO, |acc, txn| acc.checked_add(txn.amount))
    }

    /// Lifetime total of postings of `kind` tagged with `category`.
    pub fn category_total(&self, category: &str, kind: TransactionKind) -> Decimal {
        self.transactions
            .iter()
            .filter(|txn| txn.kind == kind && txn.category == category)
            .fold(Decimal::ZERO, |acc, txn| acc.saturating_add(txn.amount))
    }

    /// Income minus expense for `category`.
    pub fn category_net(&self, category: &str) -> Decimal {
        self.transactions
            .iter()
            .filter(|txn| txn.category == category)
            .map(Transaction::signed_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn posted(kind: TransactionKind, amount: Decimal, category: &str) -> Transaction {
        Transaction::new(kind, amount, category, None, None)
    }

    #[test]
    fn new_wallet_is_empty() {
        let wallet = Wallet::new("alice");
        assert_eq!(wallet.owner_login(), "alice");
        assert!(wallet.is_empty());
    }

    #[test]
    fn totals_split_by_kind_and_category() {
        let mut wallet = Wallet::new("alice");
        wallet.append(posted(TransactionKind::Income, dec!(100), "salary"));
        wallet.append(posted(TransactionKind::Expense, dec!(30), "food"));
        wallet.append(posted(TransactionKind::Expense, dec!(20.5), "food"));
        wallet.append(posted(TransactionKind::Expense, dec!(5), "taxi"));

        assert_eq!(wallet.total(TransactionKind::Income), dec!(100));
        assert_eq!(wallet.total(TransactionKind::Expense), dec!(55.5));
        assert_eq!(
            wallet.category_total("food", TransactionKind::Expense),
            dec!(50.5)
        );
        assert_eq!(
            wallet.category_total("food", TransactionKind::Income),
            Decimal::ZERO
        );
    }

    #[test]
    fn category_net_signs_postings_by_kind() {
        let mut wallet = Wallet::new("alice");
        wallet.append(posted(TransactionKind::Income, dec!(80), "food"));
        wallet.append(posted(TransactionKind::Expense, dec!(30.25), "food"));
        wallet.append(posted(TransactionKind::Expense, dec!(7), "taxi"));
        assert_eq!(wallet.category_net("food"), dec!(49.75));
        assert_eq!(wallet.category_net("taxi"), dec!(-7));
        assert_eq!(wallet.category_net("ghost"), Decimal::ZERO);
    }

    #[test]
    fn oversized_totals_saturate_instead_of_panicking() {
        let mut wallet = Wallet::new("alice");
        wallet.append(posted(TransactionKind::Income, Decimal::MAX, "salary"));
        wallet.append(posted(TransactionKind::Income, Decimal::MAX, "salary"));

        assert_eq!(wallet.checked_total(TransactionKind::Income), None);
        assert_eq!(wallet.total(TransactionKind::Income), Decimal::MAX);
        assert_eq!(
            wallet.category_total("salary", TransactionKind::Income),
            Decimal::MAX
        );
        assert_eq!(
            wallet.checked_total(TransactionKind::Expense),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn ensure_category_is_idempotent() {
        let mut wallet = Wallet::new("alice");
        wallet.ensure_category("food").unwrap().set_budget(dec!(10));
        wallet.ensure_category("food").unwrap();
        assert_eq!(wallet.categories().len(), 1);
        assert_eq!(wallet.category("food").unwrap().budget(), dec!(10));
    }

    #[test]
    fn ensure_category_rejects_blank_names() {
        let mut wallet = Wallet::new("alice");
        assert!(wallet.ensure_category(" ").is_err());
        assert!(wallet.categories().is_empty());
    }
}
