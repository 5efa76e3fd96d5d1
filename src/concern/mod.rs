//! Recovery action registry.
//!
//! A *concern* is a named troubleshooting topic (a dependency conflict, a
//! missing native extension) holding an ordered list of candidate
//! [`RecoveryAction`]s. The registry holds concerns in registration order and
//! runs them: first verified action wins, failures are soft.
//!
//! # Example
//!
//! ```
//! use sdfix::concern::{Concern, ConcernRegistry, FixContext, RecoveryAction};
//! use sdfix::env::MockEnv;
//! use std::path::Path;
//!
//! let mut registry = ConcernRegistry::new();
//! registry.register(
//!     Concern::new("demo", "Demo concern", "example")
//!         .action(RecoveryAction::new("noop", "does nothing, verifies fine")),
//! );
//!
//! let mut env = MockEnv::new();
//! let mut ctx = FixContext::new(&mut env, Path::new("/webui"));
//! let report = registry.run("demo", &mut ctx).unwrap();
//! assert_eq!(report.fixed_by(), Some("noop"));
//! ```

pub mod action;
pub mod report;
pub mod runner;

pub use action::{FixContext, RecoveryAction};
pub use report::{ActionAttempt, AttemptStatus, ConcernOutcome, ConcernReport};

use crate::error::{Result, SdfixError};

/// A named troubleshooting topic with ordered candidate actions.
#[derive(Debug)]
pub struct Concern {
    id: String,
    title: String,
    description: String,
    actions: Vec<RecoveryAction>,
}

impl Concern {
    /// New concern with no actions.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            actions: Vec::new(),
        }
    }

    /// Append an action. No dedup; order is significant — first verified
    /// success wins.
    pub fn action(mut self, action: RecoveryAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Stable kebab-case id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Longer description for `sdfix list`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The actions, in registration order.
    pub fn actions(&self) -> &[RecoveryAction] {
        &self.actions
    }
}

/// Ordered collection of concerns.
#[derive(Debug, Default)]
pub struct ConcernRegistry {
    concerns: Vec<Concern>,
}

impl ConcernRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a concern. Order is significant for `run_all`.
    pub fn register(&mut self, concern: Concern) {
        self.concerns.push(concern);
    }

    /// Look up a concern by id.
    pub fn get(&self, id: &str) -> Option<&Concern> {
        self.concerns.iter().find(|c| c.id() == id)
    }

    /// All concerns, in registration order.
    pub fn concerns(&self) -> &[Concern] {
        &self.concerns
    }

    /// Run one concern by id. Unknown ids are hard errors (caller misuse);
    /// exhausted action lists are soft failures inside the report.
    pub fn run(&self, id: &str, ctx: &mut FixContext) -> Result<ConcernReport> {
        let concern = self.get(id).ok_or_else(|| SdfixError::UnknownConcern {
            name: id.to_string(),
        })?;
        Ok(runner::run_concern(concern, ctx))
    }

    /// Run every registered concern, in registration order.
    pub fn run_all(&self, ctx: &mut FixContext) -> Result<Vec<ConcernReport>> {
        let refs: Vec<&Concern> = self.concerns.iter().collect();
        runner::run_concerns(&refs, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;
    use std::path::Path;

    #[test]
    fn register_preserves_order() {
        let mut registry = ConcernRegistry::new();
        registry.register(Concern::new("b", "B", ""));
        registry.register(Concern::new("a", "A", ""));

        let ids: Vec<&str> = registry.concerns().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn get_finds_by_id() {
        let mut registry = ConcernRegistry::new();
        registry.register(Concern::new("xformers", "xFormers", ""));
        assert!(registry.get("xformers").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn run_unknown_concern_is_hard_error() {
        let registry = ConcernRegistry::new();
        let mut env = MockEnv::new();
        let mut ctx = FixContext::new(&mut env, Path::new("/webui"));

        let result = registry.run("ghost", &mut ctx);
        assert!(matches!(result, Err(SdfixError::UnknownConcern { .. })));
    }

    #[test]
    fn run_all_visits_every_concern_in_order() {
        let mut registry = ConcernRegistry::new();
        registry.register(Concern::new("one", "One", "").action(RecoveryAction::new("go", "")));
        registry.register(Concern::new("two", "Two", "").action(RecoveryAction::new("go", "")));

        let mut env = MockEnv::new();
        let mut ctx = FixContext::new(&mut env, Path::new("/webui"));
        let reports = registry.run_all(&mut ctx).unwrap();

        let ids: Vec<&str> = reports.iter().map(|r| r.concern.as_str()).collect();
        assert_eq!(ids, vec!["one", "two"]);
    }

    #[test]
    fn duplicate_registration_is_allowed_first_wins_on_lookup() {
        let mut registry = ConcernRegistry::new();
        registry.register(Concern::new("dup", "First", ""));
        registry.register(Concern::new("dup", "Second", ""));

        assert_eq!(registry.get("dup").unwrap().title(), "First");
        assert_eq!(registry.concerns().len(), 2);
    }
}
