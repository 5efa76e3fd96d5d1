//! Read-only environment probes.
//!
//! Probes answer "what is installed and does it work" without mutating
//! anything. Every probe degrades to an "unavailable" answer instead of
//! erroring the run; a diagnostic report on a completely broken machine is
//! still a report.

pub mod gpu;
pub mod packages;
pub mod python;
pub mod torch;

pub use gpu::GpuDevice;
pub use packages::{PinDrift, ProblemPackage};
pub use python::PythonReport;
pub use torch::TorchReport;

use serde::{Deserialize, Serialize};

use crate::env::PythonEnv;
use crate::error::Result;
use crate::pip::{normalize_name, InstalledPackage};

/// Everything the probes can learn about the environment, in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub python: PythonReport,
    pub torch: TorchReport,
    pub gpus: Vec<GpuDevice>,
    pub packages: Vec<InstalledPackage>,
    pub pin_drift: Vec<PinDrift>,
    pub problematic: Vec<ProblemPackage>,
}

impl DiagnosticReport {
    /// Whether the xformers extension is installed.
    pub fn has_xformers(&self) -> bool {
        self.packages
            .iter()
            .any(|p| normalize_name(&p.name) == "xformers")
    }

    /// Concern ids worth running, derived from the probe results.
    pub fn recommended_concerns(&self) -> Vec<&'static str> {
        let mut concerns = Vec::new();
        if !self.torch.installed || self.torch.is_cpu_only() {
            concerns.push("torch-cuda");
        }
        if self.torch.cuda_available && !self.has_xformers() {
            concerns.push("xformers");
        }
        if !self.pin_drift.is_empty() {
            concerns.push("package-conflicts");
        }
        if self
            .pin_drift
            .iter()
            .any(|d| d.name == "pydantic" && d.installed.is_some())
        {
            concerns.push("pydantic-api-compat");
        }
        concerns
    }

    /// Launch flags suited to what the probes found.
    pub fn recommended_flags(&self) -> Vec<String> {
        let mut flags = vec![
            "--skip-python-version-check".to_string(),
            "--skip-install".to_string(),
        ];
        if self.torch.cuda_available {
            if self.has_xformers() {
                flags.push("--xformers".to_string());
            }
            // Anything at or below 10 GiB wants the medium-VRAM path for SDXL.
            if self.torch.total_vram_gb.is_some_and(|gb| gb <= 10.0) {
                flags.push("--medvram-sdxl".to_string());
            }
            flags.push("--no-half-vae".to_string());
        } else {
            flags.push("--no-half".to_string());
            flags.push("--precision".to_string());
            flags.push("full".to_string());
        }
        flags
    }
}

/// Run every probe and assemble the report.
pub fn collect(env: &mut dyn PythonEnv) -> Result<DiagnosticReport> {
    let python = python::probe(env)?;
    let torch = torch::probe(env)?;
    let gpus = gpu::query();
    let packages = if python.available {
        env.installed_packages().unwrap_or_default()
    } else {
        Vec::new()
    };
    let pin_drift = packages::check_pins(&packages);
    let problematic = packages::flag_problematic(&packages);

    Ok(DiagnosticReport {
        python,
        torch,
        gpus,
        packages,
        pin_drift,
        problematic,
    })
}
