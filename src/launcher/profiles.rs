//! Built-in launch profiles.
//!
//! Each profile is one of the flag/env combinations the troubleshooting
//! sessions converged on for this install. The `doctor` output references
//! them by name and `sdfix launcher --profile <name>` writes them out.

use std::str::FromStr;

use super::{LaunchFlag, LauncherTemplate, Shell};

/// Flags every generated launcher carries: the WebUI's own installer must
/// not touch the repaired environment.
const BASE_FLAGS: &[&str] = &["skip-python-version-check", "skip-install"];

/// A named launcher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchProfile {
    /// Maximum-compatibility: full precision, no optional extensions.
    Compatible,
    /// Performance: xformers attention, channels-last, autocast, CUDA
    /// allocator tuning.
    Optimized,
    /// Constrained VRAM: medvram with attention splitting.
    LowVram,
    /// Half-precision VAE artifacts workaround.
    VaeSafe,
}

impl LaunchProfile {
    /// Every profile, in display order.
    pub fn all() -> &'static [LaunchProfile] {
        &[
            Self::Compatible,
            Self::Optimized,
            Self::LowVram,
            Self::VaeSafe,
        ]
    }

    /// Stable name used on the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compatible => "compatible",
            Self::Optimized => "optimized",
            Self::LowVram => "lowvram",
            Self::VaeSafe => "vae-safe",
        }
    }

    /// One-line description for `sdfix list`.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Compatible => "full precision, no optional extensions, most likely to start",
            Self::Optimized => "xformers attention and CUDA allocator tuning for speed",
            Self::LowVram => "medvram mode for cards at or below 10 GiB",
            Self::VaeSafe => "keeps the VAE in full precision to stop grey/noisy output",
        }
    }

    /// Conventional output filename (`webui_compatible.bat`).
    pub fn default_filename(&self, shell: Shell) -> String {
        format!("webui_{}.{}", self.name().replace('-', "_"), shell.extension())
    }

    /// Build the template for this profile.
    pub fn template(&self, shell: Shell) -> LauncherTemplate {
        let mut template = LauncherTemplate::new(shell);
        match self {
            Self::Compatible => {
                template = template
                    .title("Maximum-compatibility WebUI launcher")
                    .env("XFORMERS_PACKAGE", "none");
                template = base_flags(template);
                template = template
                    .flag(LaunchFlag::switch("no-half"))
                    .flag(LaunchFlag::value("precision", "full"));
            }
            Self::Optimized => {
                template = template
                    .title("Optimized WebUI launcher")
                    .env(
                        "PYTORCH_CUDA_ALLOC_CONF",
                        "max_split_size_mb:512,expandable_segments:True",
                    )
                    .env("CUDA_MODULE_LOADING", "LAZY")
                    .env("SAFETENSORS_FAST_GPU", "1");
                template = base_flags(template);
                template = template
                    .flag(LaunchFlag::switch("xformers"))
                    .flag(LaunchFlag::switch("opt-channelslast"))
                    .flag(LaunchFlag::value("precision", "autocast"))
                    .flag(LaunchFlag::switch("upcast-sampling"))
                    .flag(LaunchFlag::switch("no-half-vae"));
            }
            Self::LowVram => {
                template = template.title("Reduced-VRAM WebUI launcher");
                template = base_flags(template);
                template = template
                    .flag(LaunchFlag::switch("medvram-sdxl"))
                    .flag(LaunchFlag::switch("opt-split-attention"))
                    .flag(LaunchFlag::switch("no-half-vae"));
            }
            Self::VaeSafe => {
                template = template.title("VAE-safe WebUI launcher");
                template = base_flags(template);
                template = template.flag(LaunchFlag::switch("no-half-vae"));
            }
        }
        template
    }
}

fn base_flags(mut template: LauncherTemplate) -> LauncherTemplate {
    for flag in BASE_FLAGS {
        template = template.flag(LaunchFlag::switch(*flag));
    }
    template
}

impl FromStr for LaunchProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LaunchProfile::all()
            .iter()
            .copied()
            .find(|p| p.name() == s.to_lowercase())
            .ok_or_else(|| {
                let names: Vec<&str> = LaunchProfile::all().iter().map(|p| p.name()).collect();
                format!("unknown profile '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_carries_base_flags() {
        for profile in LaunchProfile::all() {
            let text = profile.template(Shell::Batch).render();
            assert!(
                text.contains("--skip-python-version-check"),
                "{} missing base flags",
                profile.name()
            );
            assert!(text.contains("--skip-install"));
        }
    }

    #[test]
    fn compatible_forces_full_precision() {
        let text = LaunchProfile::Compatible.template(Shell::Batch).render();
        assert!(text.contains("--no-half"));
        assert!(text.contains("--precision full"));
        assert!(text.contains("set XFORMERS_PACKAGE=none"));
        assert!(!text.contains("--xformers "));
    }

    #[test]
    fn optimized_enables_xformers_and_allocator_tuning() {
        let text = LaunchProfile::Optimized.template(Shell::Batch).render();
        assert!(text.contains("--xformers"));
        assert!(text.contains("max_split_size_mb:512"));
        assert!(text.contains("--no-half-vae"));
    }

    #[test]
    fn lowvram_uses_medvram() {
        let text = LaunchProfile::LowVram.template(Shell::Posix).render();
        assert!(text.contains("--medvram-sdxl"));
        assert!(text.contains("--opt-split-attention"));
    }

    #[test]
    fn vae_safe_keeps_vae_full_precision() {
        let text = LaunchProfile::VaeSafe.template(Shell::Batch).render();
        assert!(text.contains("--no-half-vae"));
        assert!(!text.contains("--no-half "));
    }

    #[test]
    fn default_filenames_match_profile_names() {
        assert_eq!(
            LaunchProfile::Compatible.default_filename(Shell::Batch),
            "webui_compatible.bat"
        );
        assert_eq!(
            LaunchProfile::VaeSafe.default_filename(Shell::Posix),
            "webui_vae_safe.sh"
        );
    }

    #[test]
    fn from_str_round_trips_names() {
        for profile in LaunchProfile::all() {
            let parsed: LaunchProfile = profile.name().parse().unwrap();
            assert_eq!(parsed, *profile);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "turbo".parse::<LaunchProfile>().unwrap_err();
        assert!(err.contains("turbo"));
        assert!(err.contains("compatible"));
    }

    #[test]
    fn profile_templates_are_deterministic() {
        for profile in LaunchProfile::all() {
            assert_eq!(
                profile.template(Shell::Batch).render(),
                profile.template(Shell::Batch).render()
            );
        }
    }
}
