//! `sdfix config` — show the resolved configuration.

use crate::cli::args::ConfigArgs;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct ConfigCommand<'a> {
    config: &'a ResolvedConfig,
    _args: ConfigArgs,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(config: &'a ResolvedConfig, args: ConfigArgs) -> Self {
        Self {
            config,
            _args: args,
        }
    }
}

impl Command for ConfigCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let yaml = serde_yaml::to_string(self.config)
            .map_err(|e| anyhow::anyhow!("could not render config: {}", e))?;
        ui.message(yaml.trim_end());
        Ok(CommandResult::success())
    }
}
