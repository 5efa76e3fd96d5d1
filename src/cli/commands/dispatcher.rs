//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands
//!
//! Remediation outcomes are soft: `fix` returns exit code 0 even when every
//! action failed. Non-zero exits are reserved for hard errors — unknown
//! concern ids, unreadable config, I/O failures.

use crate::cli::args::{Cli, Commands};
use crate::config::{FileConfig, ResolvedConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command against a UI.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI subcommands to their implementations.
pub struct CommandDispatcher {
    config: ResolvedConfig,
}

impl CommandDispatcher {
    /// Build a dispatcher by resolving configuration from the CLI flags,
    /// the install root's `.sdfix.yml`, and defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_dir = cli
            .root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let file = FileConfig::load(&config_dir)?;
        let config = ResolvedConfig::resolve(file, cli.root.clone(), cli.python.clone());
        Ok(Self { config })
    }

    /// Build a dispatcher from an already-resolved config.
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Dispatch and execute a command. No subcommand means `doctor`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Doctor(args)) => {
                super::doctor::DoctorCommand::new(&self.config, args.clone()).execute(ui)
            }
            Some(Commands::Fix(args)) => {
                super::fix::FixCommand::new(&self.config, args.clone()).execute(ui)
            }
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(&self.config, args.clone()).execute(ui)
            }
            Some(Commands::Launcher(args)) => {
                super::launcher::LauncherCommand::new(&self.config, args.clone()).execute(ui)
            }
            Some(Commands::Vae(args)) => {
                super::vae::VaeCommand::new(&self.config, args.clone()).execute(ui)
            }
            Some(Commands::History(args)) => {
                super::history::HistoryCommand::new(&self.config, args.clone()).execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(&self.config, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::doctor::DoctorCommand::new(&self.config, Default::default()).execute(ui),
        }
    }
}
