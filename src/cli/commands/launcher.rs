//! `sdfix launcher` — write a launcher script for a profile.

use std::path::PathBuf;

use crate::cli::args::LauncherArgs;
use crate::config::ResolvedConfig;
use crate::error::{Result, SdfixError};
use crate::launcher::{LaunchProfile, Shell};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct LauncherCommand<'a> {
    config: &'a ResolvedConfig,
    args: LauncherArgs,
}

impl<'a> LauncherCommand<'a> {
    pub fn new(config: &'a ResolvedConfig, args: LauncherArgs) -> Self {
        Self { config, args }
    }

    fn shell(&self) -> Result<Shell> {
        match self.args.shell.as_deref() {
            None => Ok(Shell::native()),
            Some("batch") => Ok(Shell::Batch),
            Some("posix") => Ok(Shell::Posix),
            Some(other) => Err(anyhow::anyhow!(
                "unknown shell '{}' (expected batch or posix)",
                other
            )
            .into()),
        }
    }

    fn output_path(&self, profile: LaunchProfile, shell: Shell) -> PathBuf {
        self.args
            .output
            .clone()
            .unwrap_or_else(|| self.config.root.join(profile.default_filename(shell)))
    }
}

impl Command for LauncherCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let profile: LaunchProfile = self
            .args
            .profile
            .parse()
            .map_err(|e: String| SdfixError::Other(anyhow::anyhow!(e)))?;
        let shell = self.shell()?;
        let path = self.output_path(profile, shell);

        let template = profile.template(shell);
        template.write(&path)?;

        ui.success(&format!(
            "Wrote {} launcher to {}",
            profile.name(),
            path.display()
        ));
        ui.message(&format!(
            "COMMANDLINE_ARGS: {}",
            template.commandline_args()
        ));
        Ok(CommandResult::success())
    }
}
