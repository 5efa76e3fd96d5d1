//! CPU-only or missing PyTorch replaced by a CUDA build.
//!
//! One action per CUDA wheel index, tried in order of preference. Each
//! attempt uninstalls the old torch trio, installs the pinned trio against
//! that index, and verifies by asking torch itself whether CUDA works. The
//! pins match the last combination known to work on Python 3.13.

use crate::concern::{Concern, FixContext, RecoveryAction};
use crate::error::Result;
use crate::pip::PackageSpec;
use crate::probe::torch;

use super::install_or_fail;

/// The pinned torch trio; installed and uninstalled together.
pub const TORCH_TRIO: &[&str] = &["torch==2.6.0", "torchvision==0.21.0", "torchaudio==2.6.0"];

/// Wheel index URL for a CUDA index name (`cu121` → pytorch.org download URL).
pub fn index_url(index: &str) -> String {
    format!("https://download.pytorch.org/whl/{}", index)
}

fn needs_cuda_fix(ctx: &mut FixContext) -> Result<bool> {
    let report = torch::probe(ctx.env)?;
    Ok(!report.installed || report.is_cpu_only())
}

fn cuda_works(ctx: &mut FixContext) -> Result<bool> {
    Ok(torch::probe(ctx.env)?.cuda_available)
}

/// Build the `torch-cuda` concern for the given index preference order.
pub fn concern(indexes: &[String]) -> Concern {
    let mut concern = Concern::new(
        "torch-cuda",
        "CPU-only PyTorch build",
        "Replaces the CPU-only torch/torchvision/torchaudio trio with CUDA wheels, \
         trying each wheel index in preference order",
    );

    for index in indexes {
        let index = index.clone();
        let spec = PackageSpec::group(TORCH_TRIO.iter().copied())
            .extra_index(index_url(&index))
            .force_reinstall();

        concern = concern.action(
            RecoveryAction::new(index.clone(), format!("pinned torch trio from the {} index", index))
                .predicate(needs_cuda_fix)
                .effect(move |ctx| {
                    ctx.env.uninstall(&["torch", "torchvision", "torchaudio"])?;
                    install_or_fail(ctx, &spec)
                })
                .verify(cuda_works),
        );
    }
    concern
}
