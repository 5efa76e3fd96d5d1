//! gradio/pydantic/numpy version drift from the WebUI pin set.
//!
//! The WebUI stops creating its interface when these packages wander from
//! the versions release v1.10.1 expects. First attempt reinstalls the pin
//! set; the fallback purges pip's wheel cache and force-reinstalls, which
//! clears the "cached wheel satisfies the range but is broken" case.

use crate::concern::{Concern, FixContext, RecoveryAction};
use crate::error::Result;
use crate::pip::PackageSpec;
use crate::probe::packages::{check_pins, CRITICAL_PINS};

use super::install_or_fail;

/// Requirement strings for the full pin set.
pub fn pin_requirements() -> Vec<String> {
    CRITICAL_PINS
        .iter()
        .map(|(name, constraint, _)| format!("{}{}", name, constraint))
        .collect()
}

fn has_drift(ctx: &mut FixContext) -> Result<bool> {
    let installed = ctx.env.installed_packages()?;
    Ok(!check_pins(&installed).is_empty())
}

fn pins_satisfied(ctx: &mut FixContext) -> Result<bool> {
    let installed = ctx.env.installed_packages()?;
    Ok(check_pins(&installed).is_empty())
}

/// Build the `package-conflicts` concern.
pub fn concern() -> Concern {
    Concern::new(
        "package-conflicts",
        "Package versions drifted from the WebUI pin set",
        "Reinstalls the gradio/pydantic/numpy/fastapi/uvicorn versions the \
         WebUI release is known to work with",
    )
    .action(
        RecoveryAction::new("reinstall-pins", "install the known-good pin set")
            .predicate(has_drift)
            .effect(|ctx| install_or_fail(ctx, &PackageSpec::group(pin_requirements())))
            .verify(pins_satisfied),
    )
    .action(
        RecoveryAction::new(
            "purge-cache-retry",
            "purge the wheel cache, then force-reinstall the pin set",
        )
        .predicate(has_drift)
        .effect(|ctx| {
            ctx.env.cache_purge()?;
            install_or_fail(
                ctx,
                &PackageSpec::group(pin_requirements()).force_reinstall(),
            )
        })
        .verify(pins_satisfied),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concern::runner::run_concern;
    use crate::concern::ConcernOutcome;
    use crate::env::MockEnv;
    use crate::pip::PipFailure;
    use std::path::Path;

    fn pinned_env() -> MockEnv {
        MockEnv::new()
            .with_package("gradio", "3.41.2")
            .with_package("pydantic", "1.10.22")
            .with_package("numpy", "2.0.2")
            .with_package("fastapi", "0.112.0")
            .with_package("uvicorn", "0.30.0")
    }

    #[test]
    fn satisfied_pins_are_not_needed() {
        let mut env = pinned_env();
        let mut ctx = FixContext::new(&mut env, Path::new("/webui"));

        let report = run_concern(&concern(), &mut ctx);
        assert_eq!(report.outcome, ConcernOutcome::NotNeeded);
        assert!(env.install_log().is_empty());
    }

    #[test]
    fn drifted_gradio_gets_reinstalled() {
        let mut env = pinned_env().with_package("gradio", "4.44.0");
        let mut ctx = FixContext::new(&mut env, Path::new("/webui"));

        let report = run_concern(&concern(), &mut ctx);
        assert_eq!(report.fixed_by(), Some("reinstall-pins"));
        assert_eq!(env.version_of("gradio"), Some("3.41.2"));
        assert_eq!(env.cache_purges(), 0);
    }

    #[test]
    fn cache_purge_fallback_runs_when_first_install_fails() {
        let mut env = pinned_env().with_package("pydantic", "2.8.0");
        // First reinstall hits a resolver conflict; the post-purge retry
        // goes through.
        env.fail_installs_matching_times("gradio==3.41.2", PipFailure::ResolverConflict, 1);
        let mut ctx = FixContext::new(&mut env, Path::new("/webui"));

        let report = run_concern(&concern(), &mut ctx);
        assert_eq!(report.fixed_by(), Some("purge-cache-retry"));
        assert_eq!(env.cache_purges(), 1);
    }

    #[test]
    fn missing_packages_count_as_drift() {
        let mut env = MockEnv::new();
        let mut ctx = FixContext::new(&mut env, Path::new("/webui"));

        let report = run_concern(&concern(), &mut ctx);
        assert!(report.is_fixed());
        assert_eq!(env.version_of("gradio"), Some("3.41.2"));
    }

    #[test]
    fn pin_requirements_cover_every_critical_pin() {
        let reqs = pin_requirements();
        assert_eq!(reqs.len(), CRITICAL_PINS.len());
        assert!(reqs.contains(&"gradio==3.41.2".to_string()));
        assert!(reqs.contains(&"pydantic>=1.10.0,<2.0.0".to_string()));
    }
}
