use std::fmt;

use rust_decimal::Decimal;

use crate::core::wallet_store::WalletStore;
use crate::domain::{
    Category, Transaction, TransactionKind, Wallet, TRANSFER_IN_CATEGORY, TRANSFER_OUT_CATEGORY,
};
use crate::errors::{LedgerError, LedgerResult};
use crate::identity::IdentityDirectory;

/// Advisory raised after a posting. Never blocks the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWarning {
    BudgetExceeded {
        category: String,
        budget: Decimal,
        spent: Decimal,
    },
    Overspend {
        income: Decimal,
        expense: Decimal,
    },
}

impl fmt::Display for LedgerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerWarning::BudgetExceeded {
                category,
                budget,
                spent,
            } => write!(
                f,
                "budget exceeded for category `{}`: spent {} of {}",
                category, spent, budget
            ),
            LedgerWarning::Overspend { income, expense } => write!(
                f,
                "expenses ({}) exceed income ({})",
                expense, income
            ),
        }
    }
}

pub struct LedgerService;

impl LedgerService {
    pub fn create_category(store: &mut WalletStore, login: &str, name: &str) -> LedgerResult<()> {
        let category = Category::new(name)?;
        let wallet = store.get_or_load(login);
        if wallet.has_category(category.name()) {
            return Err(LedgerError::DuplicateCategory(name.to_string()));
        }
        wallet.insert_category(category);
        tracing::info!(login, category = name, "category created");
        Ok(())
    }

    /// Sets the budget of `category`, creating the category when it does not exist yet.
    pub fn set_budget(
        store: &mut WalletStore,
        login: &str,
        category: &str,
        amount: Decimal,
    ) -> LedgerResult<()> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidArgument(
                "budget must not be negative".into(),
            ));
        }
        if category.trim().is_empty() {
            return Err(LedgerError::InvalidArgument(
                "category name must not be blank".into(),
            ));
        }
        let wallet = store.get_or_load(login);
        wallet.ensure_category(category)?.set_budget(amount);
        tracing::info!(login, category, %amount, "budget set");
        Ok(())
    }

    /// Posts a transaction and returns the warnings it triggered.
    ///
    /// Income on an unknown category creates it; an expense requires an existing category.
    /// A posting that would push the lifetime total of its kind past `Decimal::MAX` is refused.
    pub fn add_transaction(
        store: &mut WalletStore,
        login: &str,
        kind: TransactionKind,
        amount: Decimal,
        category: &str,
        description: &str,
    ) -> LedgerResult<Vec<LedgerWarning>> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidArgument(
                "amount must be positive".into(),
            ));
        }
        let wallet = store.get_or_load(login);
        if kind == TransactionKind::Expense && !wallet.has_category(category) {
            return Err(LedgerError::CategoryNotFound(category.to_string()));
        }
        Self::ensure_capacity(wallet, kind, amount)?;
        wallet.ensure_category(category)?;
        Self::post(wallet, kind, amount, category, description.to_string());
        tracing::info!(login, %kind, %amount, category, "transaction posted");
        Ok(Self::evaluate_warnings(wallet, login, category))
    }

    /// Moves `amount` from `from` to `to` as a pair of postings.
    ///
    /// The sender is debited before the recipient is credited and the two writes are not
    /// atomic: if the process stops in between, only the sender's side is recorded.
    pub fn transfer(
        store: &mut WalletStore,
        directory: &dyn IdentityDirectory,
        from: &str,
        to: &str,
        amount: Decimal,
        description: &str,
    ) -> LedgerResult<Vec<LedgerWarning>> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidArgument(
                "amount must be positive".into(),
            ));
        }
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        if !directory.login_exists(to) {
            return Err(LedgerError::UnknownRecipient(to.to_string()));
        }

        Self::ensure_capacity(store.get_or_load(from), TransactionKind::Expense, amount)?;
        Self::ensure_capacity(store.get_or_load(to), TransactionKind::Income, amount)?;

        let sender = store.get_or_load(from);
        sender.ensure_category(TRANSFER_OUT_CATEGORY)?;
        Self::post(
            sender,
            TransactionKind::Expense,
            amount,
            TRANSFER_OUT_CATEGORY,
            transfer_description("Перевод: ", to, description),
        );
        let warnings = Self::evaluate_warnings(sender, from, TRANSFER_OUT_CATEGORY);

        let recipient = store.get_or_load(to);
        recipient.ensure_category(TRANSFER_IN_CATEGORY)?;
        Self::post(
            recipient,
            TransactionKind::Income,
            amount,
            TRANSFER_IN_CATEGORY,
            transfer_description("Перевод от: ", from, description),
        );

        tracing::info!(from, to, %amount, "transfer completed");
        Ok(warnings)
    }

    fn ensure_capacity(
        wallet: &Wallet,
        kind: TransactionKind,
        amount: Decimal,
    ) -> LedgerResult<()> {
        wallet
            .checked_total(kind)
            .and_then(|total| total.checked_add(amount))
            .map(|_| ())
            .ok_or_else(|| {
                LedgerError::InvalidArgument(format!("{} total would overflow", kind))
            })
    }

    fn post(
        wallet: &mut Wallet,
        kind: TransactionKind,
        amount: Decimal,
        category: &str,
        description: String,
    ) {
        wallet.append(Transaction::new(
            kind,
            amount,
            category,
            Some(description),
            None,
        ));
    }

    fn evaluate_warnings(wallet: &Wallet, login: &str, category: &str) -> Vec<LedgerWarning> {
        let mut warnings = Vec::new();
        if let Some(entry) = wallet.category(category).filter(|entry| entry.has_budget()) {
            let spent = wallet.category_total(category, TransactionKind::Expense);
            if spent > entry.budget() {
                warnings.push(LedgerWarning::BudgetExceeded {
                    category: category.to_string(),
                    budget: entry.budget(),
                    spent,
                });
            }
        }
        let income = wallet.total(TransactionKind::Income);
        let expense = wallet.total(TransactionKind::Expense);
        if expense > income {
            warnings.push(LedgerWarning::Overspend { income, expense });
        }
        for warning in &warnings {
            tracing::debug!(login, %warning, "ledger warning");
        }
        warnings
    }
}

fn transfer_description(prefix: &str, counterpart: &str, note: &str) -> String {
    if note.trim().is_empty() {
        format!("{}{}", prefix, counterpart)
    } else {
        format!("{}{} — {}", prefix, counterpart, note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    struct Known(BTreeSet<&'static str>);

    impl IdentityDirectory for Known {
        fn login_exists(&self, login: &str) -> bool {
            self.0.contains(login)
        }

        fn known_logins(&self) -> Vec<String> {
            self.0.iter().map(|login| login.to_string()).collect()
        }
    }

    fn store() -> (WalletStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
        (WalletStore::new(Box::new(storage)), temp)
    }

    #[test]
    fn create_category_rejects_duplicates_and_blanks() {
        let (mut store, _guard) = store();
        LedgerService::create_category(&mut store, "alice", "food").unwrap();
        assert_eq!(
            LedgerService::create_category(&mut store, "alice", "food"),
            Err(LedgerError::DuplicateCategory("food".into()))
        );
        assert!(matches!(
            LedgerService::create_category(&mut store, "alice", "  "),
            Err(LedgerError::InvalidArgument(_))
        ));
        // names are case-sensitive
        LedgerService::create_category(&mut store, "alice", "Food").unwrap();
        assert_eq!(store.get_or_load("alice").categories().len(), 2);
    }

    #[test]
    fn set_budget_creates_missing_category() {
        let (mut store, _guard) = store();
        LedgerService::set_budget(&mut store, "alice", "rent", dec!(900)).unwrap();
        let wallet = store.get_or_load("alice");
        assert_eq!(wallet.category("rent").unwrap().budget(), dec!(900));
    }

    #[test]
    fn set_budget_rejects_negative_amounts() {
        let (mut store, _guard) = store();
        assert!(matches!(
            LedgerService::set_budget(&mut store, "alice", "rent", dec!(-1)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(store.get_or_load("alice").categories().is_empty());
    }

    #[test]
    fn budget_warning_fires_once_spending_exceeds_budget() {
        let (mut store, _guard) = store();
        LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Income,
            dec!(1000),
            "salary",
            "",
        )
        .unwrap();
        LedgerService::set_budget(&mut store, "alice", "food", dec!(100)).unwrap();

        let warnings = LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Expense,
            dec!(100),
            "food",
            "",
        )
        .unwrap();
        assert!(warnings.is_empty());

        let warnings = LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Expense,
            dec!(0.01),
            "food",
            "",
        )
        .unwrap();
        assert_eq!(
            warnings,
            vec![LedgerWarning::BudgetExceeded {
                category: "food".into(),
                budget: dec!(100),
                spent: dec!(100.01),
            }]
        );
    }

    #[test]
    fn income_posting_still_reports_exceeded_budget() {
        let (mut store, _guard) = store();
        LedgerService::set_budget(&mut store, "alice", "misc", dec!(10)).unwrap();
        LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Income,
            dec!(100),
            "misc",
            "",
        )
        .unwrap();
        LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Expense,
            dec!(20),
            "misc",
            "",
        )
        .unwrap();

        let warnings = LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Income,
            dec!(5),
            "misc",
            "",
        )
        .unwrap();
        assert!(matches!(
            warnings.as_slice(),
            [LedgerWarning::BudgetExceeded { .. }]
        ));
    }

    #[test]
    fn zero_budget_never_warns() {
        let (mut store, _guard) = store();
        LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Income,
            dec!(50),
            "food",
            "",
        )
        .unwrap();
        let warnings = LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Expense,
            dec!(10),
            "food",
            "",
        )
        .unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn overspend_warning_compares_lifetime_totals() {
        let (mut store, _guard) = store();
        LedgerService::create_category(&mut store, "alice", "food").unwrap();
        let warnings = LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Expense,
            dec!(5),
            "food",
            "",
        )
        .unwrap();
        assert_eq!(
            warnings,
            vec![LedgerWarning::Overspend {
                income: Decimal::ZERO,
                expense: dec!(5),
            }]
        );
    }

    #[test]
    fn transfer_validation_order() {
        let (mut store, _guard) = store();
        let directory = Known(["alice", "bob"].into_iter().collect());
        assert!(matches!(
            LedgerService::transfer(&mut store, &directory, "alice", "alice", dec!(0), ""),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(
            LedgerService::transfer(&mut store, &directory, "alice", "alice", dec!(10), ""),
            Err(LedgerError::SelfTransfer)
        );
        assert_eq!(
            LedgerService::transfer(&mut store, &directory, "alice", "carol", dec!(10), ""),
            Err(LedgerError::UnknownRecipient("carol".into()))
        );
        assert!(store.get_or_load("alice").transactions().is_empty());
    }

    #[test]
    fn transfer_descriptions_name_the_counterpart() {
        let (mut store, _guard) = store();
        let directory = Known(["alice", "bob"].into_iter().collect());
        LedgerService::transfer(&mut store, &directory, "alice", "bob", dec!(100), "rent")
            .unwrap();
        LedgerService::transfer(&mut store, &directory, "alice", "bob", dec!(5), "   ").unwrap();
        LedgerService::transfer(&mut store, &directory, "alice", "bob", dec!(1), " rent ")
            .unwrap();

        let sent = store.get_or_load("alice").transactions().to_vec();
        assert_eq!(sent[0].description, "Перевод: bob — rent");
        assert_eq!(sent[1].description, "Перевод: bob");
        assert_eq!(sent[2].description, "Перевод: bob —  rent ");
        assert_eq!(sent[0].category, TRANSFER_OUT_CATEGORY);

        let received = store.get_or_load("bob").transactions().to_vec();
        assert_eq!(received[0].description, "Перевод от: alice — rent");
        assert_eq!(received[1].description, "Перевод от: alice");
        assert_eq!(received[2].description, "Перевод от: alice —  rent ");
        assert!(received
            .iter()
            .all(|txn| txn.kind == TransactionKind::Income));
    }

    #[test]
    fn transfer_warnings_come_from_sender_only() {
        let (mut store, _guard) = store();
        let directory = Known(["alice", "bob"].into_iter().collect());
        let warnings =
            LedgerService::transfer(&mut store, &directory, "alice", "bob", dec!(10), "").unwrap();
        assert_eq!(
            warnings,
            vec![LedgerWarning::Overspend {
                income: Decimal::ZERO,
                expense: dec!(10),
            }]
        );
    }

    #[test]
    fn overflowing_posting_is_rejected_and_leaves_wallet_untouched() {
        let (mut store, _guard) = store();
        LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Income,
            Decimal::MAX,
            "salary",
            "",
        )
        .unwrap();
        let result = LedgerService::add_transaction(
            &mut store,
            "alice",
            TransactionKind::Income,
            Decimal::MAX,
            "bonus",
            "",
        );
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));

        let wallet = store.get_or_load("alice");
        assert_eq!(wallet.transactions().len(), 1);
        assert!(!wallet.has_category("bonus"));
        assert_eq!(wallet.total(TransactionKind::Income), Decimal::MAX);
    }

    #[test]
    fn transfer_overflowing_recipient_touches_neither_wallet() {
        let (mut store, _guard) = store();
        let directory = Known(["alice", "bob"].into_iter().collect());
        LedgerService::add_transaction(
            &mut store,
            "bob",
            TransactionKind::Income,
            Decimal::MAX,
            "salary",
            "",
        )
        .unwrap();

        let result =
            LedgerService::transfer(&mut store, &directory, "alice", "bob", dec!(1), "");
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));

        let sender = store.get_or_load("alice");
        assert!(sender.transactions().is_empty());
        assert!(!sender.has_category(TRANSFER_OUT_CATEGORY));
        assert_eq!(store.get_or_load("bob").transactions().len(), 1);
    }

    #[test]
    fn warning_messages_are_readable() {
        let warning = LedgerWarning::BudgetExceeded {
            category: "food".into(),
            budget: dec!(100),
            spent: dec!(120),
        };
        assert_eq!(
            warning.to_string(),
            "budget exceeded for category `food`: spent 120 of 100"
        );
    }
}
