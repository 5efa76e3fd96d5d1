//! Built-in concerns for known WebUI breakage.
//!
//! Each submodule turns one troubleshooting session into a [`Concern`]: the
//! strategies that were tried by hand, in the order that worked, behind
//! predicate/effect/verify guards. Registration order here is the order
//! `fix --all` runs them: the torch build must be right before the extension
//! stack on top of it is worth touching.

pub mod conflicts;
pub mod pydantic;
pub mod torch_cuda;
pub mod vae;
pub mod xformers;

use crate::concern::{ConcernRegistry, FixContext};
use crate::error::Result;
use crate::pip::{InstallOutcome, PackageSpec};

/// Tunables threaded from config into the built-in concerns.
#[derive(Debug, Clone)]
pub struct FixOptions {
    /// CUDA wheel index names, tried in order (`cu121`, `cu118`, `cu124`).
    pub cuda_indexes: Vec<String>,
    /// VAE filename written into ui-config.json.
    pub vae_name: String,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            cuda_indexes: vec![
                "cu121".to_string(),
                "cu118".to_string(),
                "cu124".to_string(),
            ],
            vae_name: "vae-ft-ema-560000-ema-pruned.safetensors".to_string(),
        }
    }
}

/// Build the registry of built-in concerns, in fixed order.
pub fn builtin_registry(options: &FixOptions) -> ConcernRegistry {
    let mut registry = ConcernRegistry::new();
    registry.register(torch_cuda::concern(&options.cuda_indexes));
    registry.register(xformers::concern());
    registry.register(conflicts::concern());
    registry.register(pydantic::concern());
    registry.register(vae::concern(&options.vae_name));
    registry
}

/// Run an install and turn a failed outcome into an action failure.
pub(crate) fn install_or_fail(ctx: &mut FixContext, spec: &PackageSpec) -> Result<()> {
    match ctx.env.install(spec)? {
        InstallOutcome::Installed => Ok(()),
        InstallOutcome::Failed { kind, detail } => Err(anyhow::anyhow!(
            "install failed ({:?}): {}",
            kind,
            detail
        )
        .into()),
    }
}
