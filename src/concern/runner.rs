//! The remediation run loop.
//!
//! Actions run in registration order. The first action whose effect applies
//! and verifies ends the run; everything after it is never invoked. Effects
//! that error are caught and recorded, never fatal. Nothing is rolled back.

use crate::error::Result;

use super::action::FixContext;
use super::report::{ActionAttempt, AttemptStatus, ConcernOutcome, ConcernReport};
use super::Concern;

/// Run one concern's actions against the context.
pub fn run_concern(concern: &Concern, ctx: &mut FixContext) -> ConcernReport {
    let mut attempts = Vec::new();
    let mut attempted_any = false;

    for action in concern.actions() {
        let applicable = match action.run_predicate(ctx) {
            Ok(applicable) => applicable,
            Err(e) => {
                // A crashing pre-check still gets its fix attempted.
                tracing::warn!(
                    concern = concern.id(),
                    action = action.name(),
                    error = %e,
                    "predicate errored; attempting effect anyway"
                );
                true
            }
        };

        if !applicable {
            tracing::debug!(
                concern = concern.id(),
                action = action.name(),
                "not applicable"
            );
            attempts.push(ActionAttempt {
                action: action.name().to_string(),
                status: AttemptStatus::NotApplicable,
            });
            continue;
        }

        attempted_any = true;
        tracing::info!(concern = concern.id(), action = action.name(), "attempting");

        if let Err(e) = action.run_effect(ctx) {
            tracing::warn!(
                concern = concern.id(),
                action = action.name(),
                error = %e,
                "effect failed"
            );
            attempts.push(ActionAttempt {
                action: action.name().to_string(),
                status: AttemptStatus::EffectFailed {
                    detail: e.to_string(),
                },
            });
            continue;
        }

        match action.run_verify(ctx) {
            Ok(true) => {
                tracing::info!(concern = concern.id(), action = action.name(), "verified");
                attempts.push(ActionAttempt {
                    action: action.name().to_string(),
                    status: AttemptStatus::Verified,
                });
                return ConcernReport {
                    concern: concern.id().to_string(),
                    title: concern.title().to_string(),
                    outcome: ConcernOutcome::Fixed {
                        action: action.name().to_string(),
                    },
                    attempts,
                };
            }
            Ok(false) => {
                attempts.push(ActionAttempt {
                    action: action.name().to_string(),
                    status: AttemptStatus::Unverified { detail: None },
                });
            }
            Err(e) => {
                attempts.push(ActionAttempt {
                    action: action.name().to_string(),
                    status: AttemptStatus::Unverified {
                        detail: Some(e.to_string()),
                    },
                });
            }
        }
    }

    let outcome = if attempted_any {
        ConcernOutcome::Unfixed
    } else {
        ConcernOutcome::NotNeeded
    };
    ConcernReport {
        concern: concern.id().to_string(),
        title: concern.title().to_string(),
        outcome,
        attempts,
    }
}

/// Run every concern in a list, in order, collecting reports. Individual
/// outcomes never abort the sweep.
pub fn run_concerns(concerns: &[&Concern], ctx: &mut FixContext) -> Result<Vec<ConcernReport>> {
    let mut reports = Vec::with_capacity(concerns.len());
    for concern in concerns {
        reports.push(run_concern(concern, ctx));
    }
    Ok(reports)
}
