//! `sdfix history` — past remediation runs.

use crate::cli::args::HistoryArgs;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::state::{state_file, StateStore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct HistoryCommand<'a> {
    config: &'a ResolvedConfig,
    args: HistoryArgs,
}

impl<'a> HistoryCommand<'a> {
    pub fn new(config: &'a ResolvedConfig, args: HistoryArgs) -> Self {
        Self { config, args }
    }
}

impl Command for HistoryCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = state_file(&self.config.root);
        let store = StateStore::load_from(&path, &self.config.root);

        if store.runs.is_empty() {
            ui.message(&format!(
                "No remediation history for {}",
                self.config.root.display()
            ));
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!("History — {}", store.install_path));
        for record in store.recent(self.args.limit) {
            let action = record
                .action
                .as_deref()
                .map(|a| format!(" via '{}'", a))
                .unwrap_or_default();
            ui.message(&format!(
                "{}  {:<22} {}{}",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.concern,
                record.outcome,
                action,
            ));
        }
        Ok(CommandResult::success())
    }
}
