//! `sdfix list` — registered concerns and launch profiles.

use crate::cli::args::ListArgs;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::fixes::builtin_registry;
use crate::launcher::LaunchProfile;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct ListCommand<'a> {
    config: &'a ResolvedConfig,
    _args: ListArgs,
}

impl<'a> ListCommand<'a> {
    pub fn new(config: &'a ResolvedConfig, args: ListArgs) -> Self {
        Self {
            config,
            _args: args,
        }
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = builtin_registry(&self.config.fix_options());

        ui.show_header("Concerns");
        for concern in registry.concerns() {
            ui.message(&format!("{} — {}", concern.id(), concern.title()));
            for action in concern.actions() {
                ui.message(&format!("  {} — {}", action.name(), action.description()));
            }
        }

        ui.show_header("Launch profiles");
        for profile in LaunchProfile::all() {
            ui.message(&format!("{} — {}", profile.name(), profile.description()));
        }

        Ok(CommandResult::success())
    }
}
