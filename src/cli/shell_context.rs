use std::{
    env,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};
use dialoguer::theme::ColorfulTheme;
use expense_config::{Config, ConfigManager};
use expense_core::{storage::load_or_empty, storage::ExpenseStore, Clock};
use expense_domain::Expense;
use expense_storage_json::{JsonExpenseStore, StoragePaths};
use tracing::{info, warn};

use crate::cli::commands;
use crate::cli::core::{CommandError, CommandResult, LoopControl};
use crate::cli::formatters::CliFormatters;
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::system_clock::SystemClock;
use crate::errors::CliError;

/// Set to any value to read commands from stdin instead of a prompt.
pub const SCRIPT_ENV: &str = "EXPENSE_TRACKER_CLI_SCRIPT";
/// Overrides the directory holding both data and configuration.
pub const HOME_ENV: &str = "EXPENSE_TRACKER_HOME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub store: JsonExpenseStore,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub formatters: CliFormatters,
    pub clock: Box<dyn Clock>,
    pub data_root: PathBuf,
    /// In-memory copy of the stored list; replaced wholesale on every change.
    pub expenses: Vec<Expense>,
    pub running: bool,
}

impl ShellContext {
    /// Builds a context from the environment and the stored configuration.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = env::var_os(HOME_ENV).map(PathBuf::from);
        let base = home
            .clone()
            .unwrap_or_else(|| Config::default().resolve_data_root());
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not read configuration; using defaults");
            Config::default()
        });
        let data_root = home.unwrap_or_else(|| config.resolve_data_root());
        Self::assemble(mode, config_manager, config, data_root, Box::new(SystemClock))
    }

    /// Builds a context rooted at `base` with an explicit clock.
    pub fn with_base_dir(
        mode: CliMode,
        base: &Path,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.to_path_buf())?;
        let config = config_manager.load()?;
        Self::assemble(mode, config_manager, config, base.to_path_buf(), clock)
    }

    fn assemble(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        data_root: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let store = open_store(&data_root, &config)?;
        let expenses = load_or_empty(&store);
        info!(
            root = %data_root.display(),
            count = expenses.len(),
            "expense shell ready"
        );

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            store,
            config_manager,
            formatters: CliFormatters::from_config(&config),
            config,
            clock,
            data_root,
            expenses,
            running: true,
        };
        context.apply_output_preferences();
        Ok(context)
    }

    pub fn prompt(&self) -> String {
        format!("expenses[{}]> ", self.expenses.len())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Persists `expenses` and makes them the current list.
    pub(crate) fn commit(&mut self, expenses: Vec<Expense>) -> CommandResult {
        self.store.save(&expenses)?;
        self.expenses = expenses;
        Ok(())
    }

    /// Asks before a destructive step; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Pushes config-derived settings into the formatters, output, and store.
    pub(crate) fn apply_config(&mut self) -> CommandResult {
        self.formatters = CliFormatters::from_config(&self.config);
        self.apply_output_preferences();
        self.store = open_store(&self.data_root, &self.config)?;
        Ok(())
    }

    fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            plain_mode: self.config.plain_output,
            color_enabled: self.config.ui_color_enabled,
        });
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
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
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Validation(errors) => {
                cli_io::print_error("The expense was not saved:");
                for (field, message) in errors.messages() {
                    cli_io::print_info(format!("  {field}: {message}"));
                }
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}

fn open_store(data_root: &Path, config: &Config) -> Result<JsonExpenseStore, CliError> {
    let paths = StoragePaths::under(data_root);
    let store = match config.backup_retention {
        Some(retention) => JsonExpenseStore::with_retention(paths, retention)?,
        None => JsonExpenseStore::new(paths)?,
    };
    Ok(store)
}
