use std::fs;

use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::core::services::ReportService;
use crate::currency::format_amount;

use super::require_args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "show-summary",
            "Show totals, budgets and transactions",
            "show-summary",
            cmd_show_summary,
        ),
        CommandEntry::new(
            "show-category",
            "Show the net amount of categories",
            "show-category <category...>",
            cmd_show_category,
        ),
        CommandEntry::new(
            "export",
            "Write the summary to a file",
            "export <path>",
            cmd_export,
        ),
    ]
}

fn cmd_show_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let login = context.require_login()?;
    let summary = ReportService::build_summary(&mut context.store, &login, &context.config.locale);
    output::block(&summary);
    Ok(())
}

fn cmd_show_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let login = context.require_login()?;
    require_args(args, 1, "show-category <category...>")?;
    let sums = ReportService::sum_by_categories(&mut context.store, &login, args);
    if sums.is_empty() {
        output::warning("No matching categories.");
        return Ok(());
    }
    output::info("Categories:");
    for (name, net) in sums {
        output::info(format!(
            "  {}: {}",
            name,
            format_amount(&context.config.locale, net)
        ));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let login = context.require_login()?;
    require_args(args, 1, "export <path>")?;
    let summary = ReportService::build_summary(&mut context.store, &login, &context.config.locale);
    fs::write(args[0], summary)?;
    tracing::info!(login = %login, path = args[0], "summary exported");
    output::success(format!("Report saved to: {}", args[0]));
    Ok(())
}
