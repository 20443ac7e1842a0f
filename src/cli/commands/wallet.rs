use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::core::services::{LedgerService, LedgerWarning};
use crate::currency::format_amount;
use crate::domain::TransactionKind;

use super::{amount_arg, require_args};

const CREATE_CATEGORY_USAGE: &str = "create-category <name>";
const SET_BUDGET_USAGE: &str = "set-budget <category> <amount>";
const ADD_INCOME_USAGE: &str = "add-income <amount> <category> [description]";
const ADD_EXPENSE_USAGE: &str = "add-expense <amount> <category> [description]";
const TRANSFER_USAGE: &str = "transfer <login> <amount> [description]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "create-category",
            "Create a category",
            CREATE_CATEGORY_USAGE,
            cmd_create_category,
        ),
        CommandEntry::new(
            "set-budget",
            "Set the budget of a category",
            SET_BUDGET_USAGE,
            cmd_set_budget,
        ),
        CommandEntry::new("add-income", "Record income", ADD_INCOME_USAGE, cmd_add_income),
        CommandEntry::new(
            "add-expense",
            "Record an expense",
            ADD_EXPENSE_USAGE,
            cmd_add_expense,
        ),
        CommandEntry::new(
            "transfer",
            "Send money to another user",
            TRANSFER_USAGE,
            cmd_transfer,
        ),
    ]
}

fn cmd_create_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let login = context.require_login()?;
    require_args(args, 1, CREATE_CATEGORY_USAGE)?;
    LedgerService::create_category(&mut context.store, &login, args[0])?;
    output::success(format!("Category created: {}", args[0]));
    Ok(())
}

fn cmd_set_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let login = context.require_login()?;
    require_args(args, 2, SET_BUDGET_USAGE)?;
    let amount = amount_arg(args[1])?;
    LedgerService::set_budget(&mut context.store, &login, args[0], amount)?;
    output::success(format!(
        "Budget set: {} = {}",
        args[0],
        format_amount(&context.config.locale, amount)
    ));
    Ok(())
}

fn cmd_add_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    post(context, args, TransactionKind::Income, ADD_INCOME_USAGE)?;
    output::success("Income added.");
    Ok(())
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    post(context, args, TransactionKind::Expense, ADD_EXPENSE_USAGE)?;
    output::success("Expense added.");
    Ok(())
}

fn post(
    context: &mut ShellContext,
    args: &[&str],
    kind: TransactionKind,
    usage: &str,
) -> CommandResult {
    let login = context.require_login()?;
    require_args(args, 2, usage)?;
    let amount = amount_arg(args[0])?;
    let description = args.get(2).copied().unwrap_or_default();
    let warnings =
        LedgerService::add_transaction(&mut context.store, &login, kind, amount, args[1], description)?;
    context.save_all();
    print_warnings(context, &warnings);
    Ok(())
}

fn cmd_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let login = context.require_login()?;
    require_args(args, 2, TRANSFER_USAGE)?;
    let to = args[0];
    let amount = amount_arg(args[1])?;
    let description = args.get(2).copied().unwrap_or_default();
    let warnings = LedgerService::transfer(
        &mut context.store,
        &context.directory,
        &login,
        to,
        amount,
        description,
    )?;
    context.save_all();
    output::success(format!("Transferred to {}.", to));
    print_warnings(context, &warnings);
    Ok(())
}

fn print_warnings(context: &ShellContext, warnings: &[LedgerWarning]) {
    let amount = |value| format_amount(&context.config.locale, value);
    for warning in warnings {
        let message = match warning {
            LedgerWarning::BudgetExceeded {
                category,
                budget,
                spent,
            } => format!(
                "Budget exceeded for `{}`: spent {} of {}",
                category,
                amount(*spent),
                amount(*budget)
            ),
            LedgerWarning::Overspend { income, expense } => format!(
                "Expenses ({}) exceed income ({})",
                amount(*expense),
                amount(*income)
            ),
        };
        output::warning(message);
    }
}
