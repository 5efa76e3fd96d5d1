//! Missing attention-optimization extension.
//!
//! xFormers has no official wheel for this Python/torch combination, so the
//! strategies escalate: stable wheel, pre-release, the last version that
//! shipped wheels for torch 2.6, a source build, and finally git trunk.
//! Each attempt removes whatever half-installed xformers the previous one
//! left behind. "Needed" and "worked" are the same question — can the one
//! symbol the WebUI uses, `memory_efficient_attention`, actually be
//! imported — so an installed-but-broken extension still gets fixed.

use crate::concern::{Concern, FixContext, RecoveryAction};
use crate::error::Result;
use crate::pip::PackageSpec;
use crate::probe::torch;

use super::install_or_fail;

const GIT_URL: &str = "git+https://github.com/facebookresearch/xformers.git";

/// Python snippet proving the extension is importable and functional.
const VERIFY_SNIPPET: &str = r#"import json
try:
    from xformers.ops import memory_efficient_attention
    info = {"available": True}
except ImportError:
    info = {"available": False}
print(json.dumps(info))"#;

fn attention_available(ctx: &mut FixContext) -> Result<bool> {
    Ok(ctx
        .env
        .eval_json(VERIFY_SNIPPET)?
        .and_then(|v| v["available"].as_bool())
        .unwrap_or(false))
}

fn needs_xformers(ctx: &mut FixContext) -> Result<bool> {
    // Pointless without a CUDA build under it.
    if !torch::probe(ctx.env)?.cuda_available {
        return Ok(false);
    }
    Ok(!attention_available(ctx)?)
}

fn strategy(name: &str, description: &str, spec: PackageSpec) -> RecoveryAction {
    RecoveryAction::new(name, description)
        .predicate(needs_xformers)
        .effect(move |ctx| {
            ctx.env.uninstall(&["xformers"])?;
            install_or_fail(ctx, &spec)
        })
        .verify(attention_available)
}

/// Build the `xformers` concern.
pub fn concern() -> Concern {
    Concern::new(
        "xformers",
        "Missing attention-optimization extension",
        "Installs xFormers for memory-efficient attention (30-50% faster \
         generation), escalating from the stable wheel to a source build",
    )
    .action(strategy(
        "stable-wheel",
        "latest stable release",
        PackageSpec::new("xformers"),
    ))
    .action(strategy(
        "pre-release",
        "pre-release wheel (may already support this Python)",
        PackageSpec::new("xformers").pre(),
    ))
    .action(strategy(
        "pinned-0.0.23",
        "last version with torch 2.6 wheels",
        PackageSpec::new("xformers==0.0.23"),
    ))
    .action(strategy(
        "source-build",
        "build from sdist (slow, needs a toolchain)",
        PackageSpec::new("xformers").no_binary("xformers"),
    ))
    .action(strategy(
        "git-trunk",
        "development trunk from GitHub",
        PackageSpec::new(GIT_URL),
    ))
}
