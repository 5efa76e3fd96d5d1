//! Remediation run reports.
//!
//! A report records what happened per action, in order. Soft failures live
//! here — the absence of any verified action never becomes an `Err`.

use serde::{Deserialize, Serialize};

/// What happened to one action during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Predicate did not hold; the effect was never invoked.
    NotApplicable,
    /// Effect raised; caught and recorded.
    EffectFailed { detail: String },
    /// Effect completed but verification did not pass.
    Unverified {
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    /// Effect completed and verification passed.
    Verified,
}

/// One action's entry in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAttempt {
    /// Action name.
    pub action: String,
    /// What happened.
    #[serde(flatten)]
    pub status: AttemptStatus,
}

/// The overall outcome of running one concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConcernOutcome {
    /// A fix verified; attributed to the named action.
    Fixed { action: String },
    /// At least one action was attempted; none verified. Soft failure.
    Unfixed,
    /// No predicate held; nothing to do.
    NotNeeded,
}

/// Full report for one concern run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcernReport {
    /// Concern id.
    pub concern: String,
    /// Human title.
    pub title: String,
    /// Overall outcome.
    pub outcome: ConcernOutcome,
    /// Per-action record, in registration order up to the stopping point.
    pub attempts: Vec<ActionAttempt>,
}

impl ConcernReport {
    /// Whether the concern ended in a verified fix.
    pub fn is_fixed(&self) -> bool {
        matches!(self.outcome, ConcernOutcome::Fixed { .. })
    }

    /// Whether this run counts as a soft failure.
    pub fn is_unfixed(&self) -> bool {
        matches!(self.outcome, ConcernOutcome::Unfixed)
    }

    /// The attributed action name, when fixed.
    pub fn fixed_by(&self) -> Option<&str> {
        match &self.outcome {
            ConcernOutcome::Fixed { action } => Some(action),
            _ => None,
        }
    }
}
