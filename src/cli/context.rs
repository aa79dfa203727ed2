//! Shell state, dispatch and error reporting.

use std::io;

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tracing::error;

use crate::{
    config::{Config, ConfigManager},
    core::{LedgerManager, SaveStatus},
    errors::{LedgerError, ValidationError},
};

use super::commands;
use super::output;
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Line editor failure: {0}")]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Follow-up advice for failures that do not come from what the user typed.
fn environment_hint(err: &LedgerError) -> Option<&'static str> {
    if err.is_user_error() {
        return None;
    }
    error!(error = %err, "command failed");
    Some("Check the data directory and config file. RUST_LOG=debug shows details.")
}

/// Failures of a single command; reported and then the shell carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Core(LedgerError::from(err))
    }
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    pub(crate) config: Config,
    manager: LedgerManager,
    registry: CommandRegistry,
}

impl ShellContext {
    /// Loads configuration from the data directory and the ledger from its store.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = config.store(config_manager.base_dir());
        let mut context = Self::with_manager(mode, config, LedgerManager::new(store));

        let report = context.manager.load()?;
        for warning in &report.warnings {
            output::warning(format!("Skipped stored transaction ({warning})"));
        }
        Ok(context)
    }

    pub fn with_manager(mode: CliMode, config: Config, manager: LedgerManager) -> Self {
        Self {
            mode,
            running: true,
            config,
            manager,
            registry: CommandRegistry::new(commands::all_definitions()),
        }
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn manager(&self) -> &LedgerManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut LedgerManager {
        &mut self.manager
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let count = self.manager.list().len();
        format!("ledger [{count}]> ")
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let lowered = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &lowered), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(LedgerError::EmptyUndo) => {
                output::warning("Nothing to undo.");
            }
            CommandError::Core(LedgerError::IndexOutOfRange { index, len }) => {
                output::error(format!(
                    "No transaction #{} (the ledger has {len}). Use `list` to see row numbers.",
                    index + 1
                ));
            }
            CommandError::Core(err) => {
                output::error(&err);
                if let Some(hint) = environment_hint(&err) {
                    output::hint(hint);
                }
            }
        }
    }

    /// Surfaces what happened when the change was written out.
    pub(crate) fn report_save(&self, status: &SaveStatus) {
        if let SaveStatus::Failed(reason) = status {
            output::warning(format!("Change applied but could not be saved: {reason}"));
        }
    }
}
