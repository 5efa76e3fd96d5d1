//! `sdfix doctor` — probe the environment and print a diagnosis.

use crate::cli::args::DoctorArgs;
use crate::config::ResolvedConfig;
use crate::env::SystemPythonEnv;
use crate::error::Result;
use crate::probe::{self, DiagnosticReport};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct DoctorCommand<'a> {
    config: &'a ResolvedConfig,
    args: DoctorArgs,
}

impl<'a> DoctorCommand<'a> {
    pub fn new(config: &'a ResolvedConfig, args: DoctorArgs) -> Self {
        Self { config, args }
    }

    fn render(&self, report: &DiagnosticReport, ui: &mut dyn UserInterface) {
        ui.show_header("Environment diagnosis");

        match (&report.python.version, &report.python.executable) {
            (Some(version), Some(executable)) => {
                ui.success(&format!(
                    "Python {} ({}{})",
                    version,
                    executable,
                    if report.python.in_venv { ", venv" } else { "" }
                ));
            }
            _ => ui.error(&format!(
                "Python interpreter unusable: {}",
                self.config.python
            )),
        }
        match &report.python.pip_version {
            Some(pip) => ui.message(&format!("  {}", pip)),
            None => ui.warning("pip not available"),
        }

        if report.torch.installed {
            let version = report.torch.version.as_deref().unwrap_or("unknown");
            if report.torch.cuda_available {
                ui.success(&format!(
                    "PyTorch {} with CUDA {} on {}{}",
                    version,
                    report.torch.cuda_version.as_deref().unwrap_or("?"),
                    report.torch.device_name.as_deref().unwrap_or("unknown GPU"),
                    report
                        .torch
                        .total_vram_gb
                        .map(|gb| format!(" ({:.1} GiB)", gb))
                        .unwrap_or_default(),
                ));
            } else {
                ui.warning(&format!("PyTorch {} is CPU-only", version));
            }
        } else {
            ui.warning("PyTorch not installed");
        }

        if report.gpus.is_empty() {
            ui.message("  nvidia-smi: no NVIDIA GPU visible");
        }
        for gpu in &report.gpus {
            ui.message(&format!(
                "  {} (driver {}{})",
                gpu.name,
                gpu.driver_version,
                gpu.memory_total_mib
                    .map(|mib| format!(", {} MiB", mib))
                    .unwrap_or_default(),
            ));
        }

        if report.pin_drift.is_empty() {
            ui.success("Critical packages match the WebUI pin set");
        } else {
            for drift in &report.pin_drift {
                ui.warning(&format!(
                    "{} {} (want {}) — {}",
                    drift.name,
                    drift.installed.as_deref().unwrap_or("missing"),
                    drift.wanted,
                    drift.reason,
                ));
            }
        }
        for problem in &report.problematic {
            ui.warning(&format!(
                "{} {} installed — {}",
                problem.name, problem.version, problem.reason
            ));
        }

        let concerns = report.recommended_concerns();
        if concerns.is_empty() {
            ui.success("Nothing to fix");
        } else {
            ui.message("");
            ui.message(&format!(
                "Suggested next step: sdfix fix {}",
                concerns.join(" ")
            ));
        }
        ui.message(&format!(
            "Recommended launch flags: {}",
            report.recommended_flags().join(" ")
        ));
    }
}

impl Command for DoctorCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut env = SystemPythonEnv::new(&self.config.python)
            .with_install_timeout(self.config.install_timeout_secs);
        let report = probe::collect(&mut env)?;

        if self.args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            self.render(&report, ui);
        }
        Ok(CommandResult::success())
    }
}
