pub mod account;
pub mod config;
pub mod report;
pub mod system;
pub mod wallet;

use rust_decimal::Decimal;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;
use crate::currency::parse_amount;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(account::definitions());
    commands.extend(wallet::definitions());
    commands.extend(report::definitions());
    commands.extend(config::definitions());
    commands
}

/// Fails with the command usage unless at least `min` arguments were given.
pub(crate) fn require_args(args: &[&str], min: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min {
        return Err(CommandError::InvalidArguments(format!("Usage: {}", usage)));
    }
    Ok(())
}

pub(crate) fn amount_arg(raw: &str) -> Result<Decimal, CommandError> {
    parse_amount(raw)
        .ok_or_else(|| CommandError::InvalidArguments(format!("Invalid amount `{}`", raw)))
}
