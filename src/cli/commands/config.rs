use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::currency::LocaleConfig;

const USAGE: &str = "config [show|locale <tag>|decimal <char>|grouping <char|none>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View or change number formatting preferences",
        USAGE,
        cmd_config,
    )]
}

fn locale_template(tag: &str) -> Option<LocaleConfig> {
    match tag {
        "ru-RU" => Some(LocaleConfig::default()),
        "en-US" | "en-GB" => Some(LocaleConfig {
            language_tag: tag.into(),
            decimal_separator: '.',
            grouping_separator: Some(','),
        }),
        "de-DE" => Some(LocaleConfig {
            language_tag: tag.into(),
            decimal_separator: ',',
            grouping_separator: Some('.'),
        }),
        _ => None,
    }
}

fn separator_arg(raw: &str) -> Result<char, CommandError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_ascii_digit() && ch != '-' => Ok(ch),
        _ => Err(CommandError::InvalidArguments(format!(
            "Invalid separator `{}`",
            raw
        ))),
    }
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        show_config(context);
        return Ok(());
    };
    let mut locale = context.config.locale.clone();
    match (action.to_lowercase().as_str(), args.get(1)) {
        ("show", _) => {
            show_config(context);
            return Ok(());
        }
        ("locale", Some(tag)) => {
            locale = locale_template(tag).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "Unknown locale `{}` (known: ru-RU, en-US, en-GB, de-DE)",
                    tag
                ))
            })?;
        }
        ("decimal", Some(raw)) => locale.decimal_separator = separator_arg(raw)?,
        ("grouping", Some(raw)) if raw.eq_ignore_ascii_case("none") => {
            locale.grouping_separator = None;
        }
        ("grouping", Some(raw)) => locale.grouping_separator = Some(separator_arg(raw)?),
        _ => return Err(CommandError::InvalidArguments(format!("Usage: {}", USAGE))),
    }
    if locale.grouping_separator == Some(locale.decimal_separator) {
        return Err(CommandError::InvalidArguments(
            "Decimal and grouping separators must differ".into(),
        ));
    }

    let mut updated = context.config.clone();
    updated.locale = locale;
    context.config_manager.save(&updated)?;
    context.config = updated;
    tracing::info!(locale = %context.config.locale.language_tag, "config saved");
    output::success(format!(
        "Configuration saved to {}",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn show_config(context: &ShellContext) {
    let locale = &context.config.locale;
    output::section("Configuration");
    output::info(format!("  Locale            : {}", locale.language_tag));
    output::info(format!("  Decimal separator : {}", locale.decimal_separator));
    output::info(format!(
        "  Grouping separator: {}",
        locale
            .grouping_separator
            .map(|ch| ch.to_string())
            .unwrap_or_else(|| "none".into())
    ));
    output::info(format!(
        "  Data directory    : {}",
        context.config_manager.data_dir(&context.config).display()
    ));
}
