//! Recovery actions: guarded remediation steps.
//!
//! An action is three closures over a [`FixContext`]: a predicate ("is this
//! needed/applicable?"), an effect ("apply the fix"), and a verification
//! ("did it work?"). Predicates and verifications are read-only by intent;
//! effects mutate the host environment and are never rolled back.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::PythonEnv;
use crate::error::Result;

/// The capability surface a recovery action runs against.
pub struct FixContext<'a> {
    /// The host Python environment (installs, uninstalls, probes).
    pub env: &'a mut dyn PythonEnv,
    /// WebUI install root, for config and launcher artifacts.
    pub root: &'a Path,
}

impl<'a> FixContext<'a> {
    pub fn new(env: &'a mut dyn PythonEnv, root: &'a Path) -> Self {
        Self { env, root }
    }

    /// A path inside the install root.
    pub fn root_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

type CheckFn = Box<dyn Fn(&mut FixContext) -> Result<bool>>;
type EffectFn = Box<dyn Fn(&mut FixContext) -> Result<()>>;

/// A named, guarded remediation step.
///
/// Defaults: predicate always holds, effect does nothing, verification
/// always passes. A "skip" fallback action is therefore just
/// `RecoveryAction::new("skip", "...")`.
pub struct RecoveryAction {
    name: String,
    description: String,
    predicate: CheckFn,
    effect: EffectFn,
    verify: CheckFn,
}

impl RecoveryAction {
    /// New action with default closures.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            predicate: Box::new(|_| Ok(true)),
            effect: Box::new(|_| Ok(())),
            verify: Box::new(|_| Ok(true)),
        }
    }

    /// Set the predicate.
    pub fn predicate(mut self, f: impl Fn(&mut FixContext) -> Result<bool> + 'static) -> Self {
        self.predicate = Box::new(f);
        self
    }

    /// Set the effect.
    pub fn effect(mut self, f: impl Fn(&mut FixContext) -> Result<()> + 'static) -> Self {
        self.effect = Box::new(f);
        self
    }

    /// Set the verification.
    pub fn verify(mut self, f: impl Fn(&mut FixContext) -> Result<bool> + 'static) -> Self {
        self.verify = Box::new(f);
        self
    }

    /// Action name (stable, used in reports and history).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line human description.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn run_predicate(&self, ctx: &mut FixContext) -> Result<bool> {
        (self.predicate)(ctx)
    }

    pub(crate) fn run_effect(&self, ctx: &mut FixContext) -> Result<()> {
        (self.effect)(ctx)
    }

    pub(crate) fn run_verify(&self, ctx: &mut FixContext) -> Result<bool> {
        (self.verify)(ctx)
    }
}

impl fmt::Debug for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryAction")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
