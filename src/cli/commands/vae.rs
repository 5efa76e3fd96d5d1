//! `sdfix vae` — set the preferred VAE in ui-config.json.

use crate::cli::args::VaeArgs;
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::uiconfig::{UiConfig, UI_CONFIG_FILENAME};

use super::dispatcher::{Command, CommandResult};

pub struct VaeCommand<'a> {
    config: &'a ResolvedConfig,
    args: VaeArgs,
}

impl<'a> VaeCommand<'a> {
    pub fn new(config: &'a ResolvedConfig, args: VaeArgs) -> Self {
        Self { config, args }
    }
}

impl Command for VaeCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let vae_name = self
            .args
            .name
            .clone()
            .unwrap_or_else(|| self.config.preferred_vae.clone());
        let path = self.config.root.join(UI_CONFIG_FILENAME);

        let mut config = UiConfig::load(&path)?;
        let previous = config.preferred_vae().map(String::from);
        config.set_preferred_vae(&vae_name);
        config.save(&path)?;

        match previous {
            Some(old) if old != vae_name => {
                ui.success(&format!("Preferred VAE: {} (was {})", vae_name, old));
            }
            Some(_) => ui.success(&format!("Preferred VAE already {}", vae_name)),
            None => ui.success(&format!("Preferred VAE: {}", vae_name)),
        }

        if !self.config.root.join("models/VAE").join(&vae_name).exists() {
            ui.warning(&format!(
                "models/VAE/{} not found — download it before launching",
                vae_name
            ));
        }
        Ok(CommandResult::success())
    }
}
