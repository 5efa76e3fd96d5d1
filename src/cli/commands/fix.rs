//! `sdfix fix` — run recovery actions for one or more concerns.
//!
//! Remediation outcomes are soft: the command exits 0 even when every
//! action failed, reporting the attempts instead. Only caller misuse
//! (an unknown concern id) or hard I/O failures exit non-zero.

use crate::cli::args::FixArgs;
use crate::concern::{AttemptStatus, ConcernOutcome, ConcernReport, FixContext};
use crate::config::ResolvedConfig;
use crate::env::SystemPythonEnv;
use crate::error::{Result, SdfixError};
use crate::fixes::builtin_registry;
use crate::state::{state_file, RunRecord, StateStore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct FixCommand<'a> {
    config: &'a ResolvedConfig,
    args: FixArgs,
}

impl<'a> FixCommand<'a> {
    pub fn new(config: &'a ResolvedConfig, args: FixArgs) -> Self {
        Self { config, args }
    }

    fn render_report(&self, report: &ConcernReport, ui: &mut dyn UserInterface) {
        match &report.outcome {
            ConcernOutcome::Fixed { action } => {
                ui.success(&format!("{}: fixed via '{}'", report.concern, action));
            }
            ConcernOutcome::NotNeeded => {
                ui.message(&format!("{}: nothing to do", report.concern));
            }
            ConcernOutcome::Unfixed => {
                ui.warning(&format!(
                    "{}: no recovery action verified ({} attempted)",
                    report.concern,
                    report
                        .attempts
                        .iter()
                        .filter(|a| a.status != AttemptStatus::NotApplicable)
                        .count(),
                ));
                for attempt in &report.attempts {
                    match &attempt.status {
                        AttemptStatus::EffectFailed { detail } => {
                            ui.warning(&format!("  {} failed: {}", attempt.action, detail));
                        }
                        AttemptStatus::Unverified { detail } => {
                            ui.warning(&format!(
                                "  {} applied but did not verify{}",
                                attempt.action,
                                detail
                                    .as_deref()
                                    .map(|d| format!(" ({})", d))
                                    .unwrap_or_default(),
                            ));
                        }
                        AttemptStatus::NotApplicable | AttemptStatus::Verified => {}
                    }
                }
            }
        }
    }
}

impl Command for FixCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = builtin_registry(&self.config.fix_options());

        let ids: Vec<String> = if self.args.concerns.is_empty() || self.args.all {
            registry.concerns().iter().map(|c| c.id().to_string()).collect()
        } else {
            self.args.concerns.clone()
        };

        // Reject unknown ids before mutating anything.
        let mut concerns = Vec::with_capacity(ids.len());
        for id in &ids {
            match registry.get(id) {
                Some(concern) => concerns.push(concern),
                None => return Err(SdfixError::UnknownConcern { name: id.clone() }),
            }
        }

        if self.args.dry_run {
            ui.show_header("Dry run");
            for concern in &concerns {
                ui.message(&format!("{} — {}", concern.id(), concern.title()));
                for action in concern.actions() {
                    ui.message(&format!("  {} — {}", action.name(), action.description()));
                }
            }
            return Ok(CommandResult::success());
        }

        if ui.is_interactive() && !self.args.yes {
            let question = format!(
                "Run {} concern(s) against {}? Package installs are not rolled back.",
                ids.len(),
                self.config.root.display(),
            );
            if !ui.confirm("apply_fixes", &question, true)? {
                ui.message("Nothing applied.");
                return Ok(CommandResult::success());
            }
        }

        let mut env = SystemPythonEnv::new(&self.config.python)
            .with_install_timeout(self.config.install_timeout_secs);
        let mut ctx = FixContext::new(&mut env, &self.config.root);

        let state_path = state_file(&self.config.root);
        let mut store = StateStore::load_from(&state_path, &self.config.root);

        let mut fixed = 0usize;
        let mut unfixed = 0usize;
        let mut reports = Vec::with_capacity(concerns.len());

        for concern in &concerns {
            let id = concern.id();
            let mut spinner = ui.start_spinner(&format!("{} — {}", id, concern.title()));
            let report = registry.run(id, &mut ctx)?;

            match &report.outcome {
                ConcernOutcome::Fixed { action } => {
                    fixed += 1;
                    spinner.finish_success(&format!("{}: fixed via '{}'", id, action));
                }
                ConcernOutcome::NotNeeded => {
                    spinner.finish_skipped(&format!("{}: nothing to do", id));
                }
                ConcernOutcome::Unfixed => {
                    unfixed += 1;
                    spinner.finish_error(&format!("{}: no recovery action verified", id));
                }
            }
            store.record(RunRecord::from_report(&report));
            reports.push(report);
        }

        // History is best-effort; a read-only state dir must not fail the run.
        if let Err(e) = store.save_to(&state_path) {
            tracing::warn!(error = %e, "could not save run history");
        }

        ui.show_header("Summary");
        for report in &reports {
            self.render_report(report, ui);
        }
        if unfixed > 0 {
            ui.warning(&format!(
                "{} of {} concern(s) remain unfixed; see attempts above",
                unfixed,
                concerns.len(),
            ));
        } else if fixed > 0 {
            ui.success(&format!("{} concern(s) fixed", fixed));
        }

        Ok(CommandResult::success())
    }
}
