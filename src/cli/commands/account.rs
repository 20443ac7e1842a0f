use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

use super::require_args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "register",
            "Register a new user",
            "register <login> <password>",
            cmd_register,
        ),
        CommandEntry::new(
            "login",
            "Log in and open your wallet",
            "login <login> <password>",
            cmd_login,
        ),
        CommandEntry::new("logout", "Close the current session", "logout", cmd_logout),
    ]
}

fn cmd_register(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "register <login> <password>")?;
    let user = context.directory.register(args[0], args[1])?;
    context.save_all();
    output::success(format!("User registered: {}", user));
    Ok(())
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "login <login> <password>")?;
    let user = context.directory.authenticate(args[0], args[1])?;
    let report = context.store.open_session(user.login());
    context.report_save_failures(&report);
    output::success(format!("Logged in as: {}", user));
    context.session = Some(user);
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if let Some(user) = context.session.take() {
        tracing::info!(login = user.login(), "session closed");
    }
    output::success("Logged out.");
    Ok(())
}
