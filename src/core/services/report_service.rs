use std::collections::BTreeMap;
use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::core::wallet_store::WalletStore;
use crate::currency::{format_amount, LocaleConfig};
use crate::domain::{TransactionKind, Wallet};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const NONE_MARKER: &str = "  (none)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Budget of one category and what is left of it after lifetime expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetLine {
    pub category: String,
    pub budget: Decimal,
    pub remaining: Decimal,
}

pub struct ReportService;

impl ReportService {
    pub fn totals(wallet: &Wallet) -> Totals {
        Totals {
            income: wallet.total(TransactionKind::Income),
            expense: wallet.total(TransactionKind::Expense),
        }
    }

    /// Net (income minus expense) of each named category, in caller order.
    ///
    /// Names the wallet does not know are left out of the result.
    pub fn sum_by_categories<S: AsRef<str>>(
        store: &mut WalletStore,
        login: &str,
        names: &[S],
    ) -> Vec<(String, Decimal)> {
        let wallet = store.get_or_load(login);
        Self::net_by_categories(wallet, names)
    }

    pub fn net_by_categories<S: AsRef<str>>(wallet: &Wallet, names: &[S]) -> Vec<(String, Decimal)> {
        let mut result = Vec::new();
        for name in names.iter().map(|name| name.as_ref()) {
            if !wallet.has_category(name) {
                continue;
            }
            result.push((name.to_string(), wallet.category_net(name)));
        }
        result
    }

    /// Sums postings of `kind` per category, sorted by category name.
    pub fn grouped(wallet: &Wallet, kind: TransactionKind) -> BTreeMap<String, Decimal> {
        let mut groups = BTreeMap::new();
        for txn in wallet.transactions().iter().filter(|txn| txn.kind == kind) {
            let sum = groups.entry(txn.category.clone()).or_insert(Decimal::ZERO);
            *sum = sum.saturating_add(txn.amount);
        }
        groups
    }

    pub fn budget_lines(wallet: &Wallet) -> Vec<BudgetLine> {
        wallet
            .categories()
            .values()
            .map(|category| BudgetLine {
                category: category.name().to_string(),
                budget: category.budget(),
                remaining: category.budget()
                    - wallet.category_total(category.name(), TransactionKind::Expense),
            })
            .collect()
    }

    pub fn build_summary(store: &mut WalletStore, login: &str, locale: &LocaleConfig) -> String {
        let wallet = store.get_or_load(login);
        Self::render_summary(wallet, locale)
    }

    /// Renders the full textual summary of `wallet`.
    pub fn render_summary(wallet: &Wallet, locale: &LocaleConfig) -> String {
        let amount = |value: Decimal| format_amount(locale, value);
        let totals = Self::totals(wallet);
        let mut out = String::new();

        let _ = writeln!(out, "=== Summary for {} ===", wallet.owner_login());
        let _ = writeln!(out, "Total income: {}", amount(totals.income));
        let _ = writeln!(out, "Total expense: {}", amount(totals.expense));

        for (title, kind) in [
            ("Income by category:", TransactionKind::Income),
            ("Expense by category:", TransactionKind::Expense),
        ] {
            let groups = Self::grouped(wallet, kind);
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", title);
            write_section(
                &mut out,
                groups
                    .iter()
                    .map(|(name, sum)| format!("  {}: {}", name, amount(*sum))),
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Budgets:");
        write_section(
            &mut out,
            Self::budget_lines(wallet).into_iter().map(|line| {
                format!(
                    "  {}: {}, remaining: {}",
                    line.category,
                    amount(line.budget),
                    amount(line.remaining)
                )
            }),
        );

        let _ = writeln!(out);
        let _ = writeln!(out, "Transactions:");
        write_section(
            &mut out,
            wallet.transactions().iter().map(|txn| {
                let mut line = format!(
                    "  [{}] {} {} ({})",
                    txn.time.format(TIMESTAMP_FORMAT),
                    txn.kind,
                    amount(txn.amount),
                    txn.category
                );
                if !txn.description.is_empty() {
                    line.push(' ');
                    line.push_str(&txn.description);
                }
                line
            }),
        );
        out
    }
}

fn write_section(out: &mut String, lines: impl Iterator<Item = String>) {
    let mut empty = true;
    for line in lines {
        empty = false;
        out.push_str(&line);
        out.push('\n');
    }
    if empty {
        out.push_str(NONE_MARKER);
        out.push('\n');
    }
}
