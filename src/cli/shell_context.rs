use strsim::levenshtein;

use crate::{
    cli::{
        commands,
        core::{CliError, CliMode, CommandError, LoopControl},
        output,
        registry::{CommandEntry, CommandRegistry},
    },
    config::{Config, ConfigManager},
    core::{SaveReport, WalletStore},
    domain::User,
    identity::{IdentityDirectory, UserDirectory},
    storage::{JsonStorage, SafeLoad},
};

/// State shared by every command of one shell run.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: WalletStore,
    pub directory: UserDirectory,
    pub session: Option<User>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let data_dir = config_manager.data_dir(&config);
        let storage = JsonStorage::new(Some(data_dir))?;

        let directory = match UserDirectory::load(&storage) {
            SafeLoad::Degraded { value, reason } => {
                output::warning(format!("User directory could not be read ({}).", reason));
                value
            }
            loaded => loaded.into_inner(),
        };
        tracing::debug!(users = directory.len(), base = %storage.base_dir().display(), "shell ready");

        Ok(Self {
            mode,
            registry: CommandRegistry::with_entries(commands::all_definitions()),
            config_manager,
            config,
            store: WalletStore::new(Box::new(storage)),
            directory,
            session: None,
            last_command: None,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        match &self.session {
            Some(user) => format!("{}> ", user.login()),
            None => "> ".to_string(),
        }
    }

    /// Login of the active session, or [`CommandError::LoginRequired`].
    pub fn require_login(&self) -> Result<String, CommandError> {
        self.session
            .as_ref()
            .map(|user| user.login().to_string())
            .ok_or(CommandError::LoginRequired)
    }

    /// Persists the user directory and every wallet loaded during this run.
    ///
    /// Failures are printed as warnings and never abort the command that triggered the sweep.
    pub fn save_all(&self) -> SaveReport {
        if let Err(err) = self.directory.save(self.store.storage()) {
            tracing::error!(error = %err, "failed to save user directory");
            output::warning(format!("User directory was not saved: {}", err));
        }
        let logins = self.directory.known_logins();
        let report = self.store.save_all(logins.iter().map(String::as_str));
        self.report_save_failures(&report);
        report
    }

    pub(crate) fn report_save_failures(&self, report: &SaveReport) {
        for failure in &report.failed {
            output::warning(format!(
                "Wallet of `{}` was not saved: {}",
                failure.login, failure.reason
            ));
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}
