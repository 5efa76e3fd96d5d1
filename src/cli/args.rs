//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// sdfix - Diagnostics and remediation for local Stable Diffusion WebUI installs.
#[derive(Debug, Parser)]
#[command(name = "sdfix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// WebUI install root (overrides config and current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Python interpreter to use (overrides config and venv detection)
    #[arg(short, long, global = true)]
    pub python: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe the environment and print a diagnosis (default)
    Doctor(DoctorArgs),

    /// Run recovery actions for one or more concerns
    Fix(FixArgs),

    /// List registered concerns and launch profiles
    List(ListArgs),

    /// Write a launcher script for a profile
    Launcher(LauncherArgs),

    /// Set the preferred VAE in ui-config.json
    Vae(VaeArgs),

    /// Show past remediation runs
    History(HistoryArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `doctor` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DoctorArgs {
    /// Output the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `fix` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FixArgs {
    /// Concerns to run (default: all registered concerns)
    pub concerns: Vec<String>,

    /// Run every registered concern
    #[arg(long)]
    pub all: bool,

    /// Show what would run without applying effects
    #[arg(long)]
    pub dry_run: bool,

    /// Apply without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {}

/// Arguments for the `launcher` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LauncherArgs {
    /// Profile to write (compatible, optimized, lowvram, vae-safe)
    #[arg(long, default_value = "compatible")]
    pub profile: String,

    /// Script dialect (batch, posix; default matches this platform)
    #[arg(long)]
    pub shell: Option<String>,

    /// Output path (default: <root>/webui_<profile>.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Default for LauncherArgs {
    fn default() -> Self {
        Self {
            profile: "compatible".to_string(),
            shell: None,
            output: None,
        }
    }
}

/// Arguments for the `vae` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VaeArgs {
    /// VAE filename (default: from config)
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, clap::Args)]
pub struct HistoryArgs {
    /// Number of records to show
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

impl Default for HistoryArgs {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_bare_invocation_as_no_command() {
        let cli = Cli::try_parse_from(["sdfix"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_fix_with_concerns() {
        let cli = Cli::try_parse_from(["sdfix", "fix", "torch-cuda", "xformers"]).unwrap();
        match cli.command {
            Some(Commands::Fix(args)) => {
                assert_eq!(args.concerns, vec!["torch-cuda", "xformers"]);
                assert!(!args.dry_run);
            }
            _ => panic!("expected fix command"),
        }
    }

    #[test]
    fn parses_global_root_after_subcommand() {
        let cli = Cli::try_parse_from(["sdfix", "doctor", "--root", "/webui"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/webui")));
    }

    #[test]
    fn parses_launcher_profile() {
        let cli =
            Cli::try_parse_from(["sdfix", "launcher", "--profile", "optimized"]).unwrap();
        match cli.command {
            Some(Commands::Launcher(args)) => assert_eq!(args.profile, "optimized"),
            _ => panic!("expected launcher command"),
        }
    }

    #[test]
    fn fix_dry_run_and_yes_flags() {
        let cli = Cli::try_parse_from(["sdfix", "fix", "--all", "--dry-run", "-y"]).unwrap();
        match cli.command {
            Some(Commands::Fix(args)) => {
                assert!(args.all);
                assert!(args.dry_run);
                assert!(args.yes);
            }
            _ => panic!("expected fix command"),
        }
    }
}
