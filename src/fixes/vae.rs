//! Grey or noisy output from a half-precision VAE.
//!
//! The fix is configuration, not packages: point the WebUI at a known-good
//! VAE in ui-config.json and launch with `--no-half-vae`. If that can't be
//! written, fall back to a full-precision launcher, which is slower but
//! produces correct images on every card.

use std::path::Path;

use crate::concern::{Concern, FixContext, RecoveryAction};
use crate::error::Result;
use crate::launcher::{LaunchFlag, LaunchProfile, Shell};
use crate::uiconfig::{UiConfig, UI_CONFIG_FILENAME};

fn launcher_path(root: &Path, profile: LaunchProfile) -> std::path::PathBuf {
    root.join(profile.default_filename(Shell::native()))
}

fn vae_configured(ctx: &mut FixContext, vae_name: &str) -> Result<bool> {
    let config = UiConfig::load(&ctx.root_path(UI_CONFIG_FILENAME))?;
    Ok(config.preferred_vae() == Some(vae_name)
        && launcher_path(ctx.root, LaunchProfile::VaeSafe).exists())
}

/// Build the `vae-artifacts` concern.
pub fn concern(vae_name: &str) -> Concern {
    let name_for_predicate = vae_name.to_string();
    let name_for_effect = vae_name.to_string();
    let name_for_verify = vae_name.to_string();

    Concern::new(
        "vae-artifacts",
        "Grey or noisy images from half-precision VAE",
        "Sets the preferred VAE in ui-config.json and writes a --no-half-vae \
         launcher; falls back to a full-precision launcher",
    )
    .action(
        RecoveryAction::new(
            "set-preferred-vae",
            "configure the known-good VAE and a VAE-safe launcher",
        )
        .predicate(move |ctx| Ok(!vae_configured(ctx, &name_for_predicate)?))
        .effect(move |ctx| {
            let config_path = ctx.root_path(UI_CONFIG_FILENAME);
            let mut config = UiConfig::load(&config_path)?;
            config.set_preferred_vae(&name_for_effect);
            config.save(&config_path)?;

            let shell = Shell::native();
            let mut template = LaunchProfile::VaeSafe.template(shell);
            let vae_file = ctx.root_path(&format!("models/VAE/{}", name_for_effect));
            if vae_file.exists() {
                template = template.flag(LaunchFlag::value(
                    "vae-path",
                    format!("models/VAE/{}", name_for_effect),
                ));
            }
            template.write(&launcher_path(ctx.root, LaunchProfile::VaeSafe))
        })
        .verify(move |ctx| vae_configured(ctx, &name_for_verify)),
    )
    .action(
        RecoveryAction::new(
            "full-precision-launcher",
            "run everything in full precision (slow but correct)",
        )
        .effect(|ctx| {
            LaunchProfile::Compatible
                .template(Shell::native())
                .write(&launcher_path(ctx.root, LaunchProfile::Compatible))
        })
        .verify(|ctx| Ok(launcher_path(ctx.root, LaunchProfile::Compatible).exists())),
    )
}
