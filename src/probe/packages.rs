//! Installed-package checks: WebUI pin drift and known-problem packages.

use serde::{Deserialize, Serialize};

use crate::pip::{normalize_name, Constraint, InstalledPackage};

/// Versions the WebUI release this tool targets (v1.10.1) is known to work
/// with. Anything outside these ranges breaks interface creation.
pub const CRITICAL_PINS: &[(&str, &str, &str)] = &[
    ("gradio", "==3.41.2", "exact version expected by the WebUI"),
    ("pydantic", ">=1.10.0,<2.0.0", "v2 removed the __config__ API"),
    ("numpy", ">=2.0.2", "older builds break blendmodes"),
    ("fastapi", ">=0.100.0", "API route registration"),
    ("uvicorn", ">=0.23.0", "ASGI server"),
];

/// Packages whose mere presence causes trouble on this stack.
pub const PROBLEMATIC_PACKAGES: &[(&str, &str)] = &[
    ("clip", "clip-by-openai requires torch<1.7.2"),
    ("open-clip-torch", "needs sentencepiece, which needs cmake"),
    ("sentencepiece", "requires cmake compilation"),
    ("triton", "TORCH_LIBRARY registration conflicts"),
];

/// One critical package out of range (or missing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDrift {
    /// Distribution name.
    pub name: String,
    /// The wanted constraint.
    pub wanted: String,
    /// Why the pin exists.
    pub reason: String,
    /// Installed version, or None when missing entirely.
    pub installed: Option<String>,
}

/// Compare the installed set against [`CRITICAL_PINS`].
pub fn check_pins(installed: &[InstalledPackage]) -> Vec<PinDrift> {
    CRITICAL_PINS
        .iter()
        .filter_map(|(name, wanted, reason)| {
            let version = installed
                .iter()
                .find(|p| normalize_name(&p.name) == normalize_name(name))
                .map(|p| p.version.clone());
            let satisfied = version
                .as_deref()
                .is_some_and(|v| Constraint::parse(wanted).matches(v));
            if satisfied {
                None
            } else {
                Some(PinDrift {
                    name: name.to_string(),
                    wanted: wanted.to_string(),
                    reason: reason.to_string(),
                    installed: version,
                })
            }
        })
        .collect()
}

/// A package from [`PROBLEMATIC_PACKAGES`] found installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemPackage {
    pub name: String,
    pub version: String,
    pub reason: String,
}

/// Flag installed packages known to cause trouble.
pub fn flag_problematic(installed: &[InstalledPackage]) -> Vec<ProblemPackage> {
    installed
        .iter()
        .filter_map(|p| {
            let normalized = normalize_name(&p.name);
            PROBLEMATIC_PACKAGES
                .iter()
                .find(|(name, _)| normalize_name(name) == normalized)
                .map(|(_, reason)| ProblemPackage {
                    name: p.name.clone(),
                    version: p.version.clone(),
                    reason: reason.to_string(),
                })
        })
        .collect()
}
