//! Mock [`PythonEnv`] for testing.
//!
//! `MockEnv` scripts install outcomes and probe results, applies successful
//! installs to an in-memory package set, and records every call for later
//! assertion.
//!
//! # Example
//!
//! ```
//! use sdfix::env::{MockEnv, PythonEnv};
//! use sdfix::pip::{PackageSpec, PipFailure};
//!
//! let mut env = MockEnv::new();
//! env.fail_installs_matching("cu121", PipFailure::NoMatchingDistribution);
//!
//! let outcome = env.install(&PackageSpec::new("torch==2.6.0")
//!     .extra_index("https://download.pytorch.org/whl/cu121")).unwrap();
//! assert!(!outcome.is_installed());
//! assert_eq!(env.install_log().len(), 1);
//! ```

use std::collections::{BTreeMap, VecDeque};

use crate::error::Result;
use crate::pip::{
    normalize_name, requirement_name, InstallOutcome, InstalledPackage, PackageSpec, PipFailure,
};

use super::PythonEnv;

#[derive(Debug)]
struct FailureRule {
    needle: String,
    kind: PipFailure,
    /// How many more times this rule fires; None = unlimited.
    remaining: Option<usize>,
}

/// In-memory scripted environment.
#[derive(Debug, Default)]
pub struct MockEnv {
    packages: BTreeMap<String, String>,
    install_failures: Vec<FailureRule>,
    eval_rules: Vec<(String, serde_json::Value)>,
    eval_queues: Vec<(String, VecDeque<serde_json::Value>)>,
    pip_version: Option<String>,
    install_log: Vec<String>,
    uninstall_log: Vec<String>,
    eval_log: Vec<String>,
    cache_purges: usize,
}

impl MockEnv {
    /// Empty environment: nothing installed, every install succeeds,
    /// every eval returns `None`.
    pub fn new() -> Self {
        Self {
            pip_version: Some("pip 24.0 (mock)".to_string()),
            ..Default::default()
        }
    }

    /// Pre-install a package at a version.
    pub fn with_package(mut self, name: &str, version: &str) -> Self {
        self.packages
            .insert(normalize_name(name), version.to_string());
        self
    }

    /// Make installs whose rendered spec contains `needle` fail.
    pub fn fail_installs_matching(&mut self, needle: &str, kind: PipFailure) {
        self.install_failures.push(FailureRule {
            needle: needle.to_string(),
            kind,
            remaining: None,
        });
    }

    /// Like [`fail_installs_matching`](Self::fail_installs_matching), but
    /// the rule only fires for the first `times` matching installs.
    pub fn fail_installs_matching_times(&mut self, needle: &str, kind: PipFailure, times: usize) {
        self.install_failures.push(FailureRule {
            needle: needle.to_string(),
            kind,
            remaining: Some(times),
        });
    }

    /// Script an `eval_json` result for snippets containing `needle`.
    /// Rules are matched in insertion order; first match wins.
    pub fn set_eval_result(&mut self, needle: &str, value: serde_json::Value) {
        self.eval_rules.push((needle.to_string(), value));
    }

    /// Queue successive `eval_json` results for snippets containing
    /// `needle`. Queued values are consumed in order before the static
    /// rules are consulted — for probes whose answer changes between calls.
    pub fn queue_eval_results(&mut self, needle: &str, values: Vec<serde_json::Value>) {
        self.eval_queues
            .push((needle.to_string(), values.into_iter().collect()));
    }

    /// Pretend pip itself is broken.
    pub fn break_pip(&mut self) {
        self.pip_version = None;
    }

    /// Rendered specs passed to `install`, in order.
    pub fn install_log(&self) -> &[String] {
        &self.install_log
    }

    /// Names passed to `uninstall`, flattened, in order.
    pub fn uninstall_log(&self) -> &[String] {
        &self.uninstall_log
    }

    /// Snippets passed to `eval_json`, in order.
    pub fn eval_log(&self) -> &[String] {
        &self.eval_log
    }

    /// How many times the cache was purged.
    pub fn cache_purges(&self) -> usize {
        self.cache_purges
    }

    /// Current version of an installed package.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.packages.get(&normalize_name(name)).map(|s| s.as_str())
    }

    fn apply_install(&mut self, spec: &PackageSpec) {
        for requirement in &spec.requirements {
            let name = requirement_name(requirement);
            let rest = requirement.strip_prefix(name).unwrap_or("");
            self.packages
                .insert(normalize_name(name), synthesized_version(rest));
        }
    }
}

/// Version a mock install leaves behind: the first constraint clause's bound
/// (`==3.41.2` → `3.41.2`, `>=1.10.0,<2.0.0` → `1.10.0`), or a placeholder
/// for unconstrained requirements.
fn synthesized_version(constraint: &str) -> String {
    let first = constraint.split(',').next().unwrap_or("");
    let version = first
        .trim_start_matches(['=', '>', '<', '!', '~'])
        .trim();
    if version.is_empty() {
        "0.0.0-latest".to_string()
    } else {
        version.to_string()
    }
}

impl PythonEnv for MockEnv {
    fn install(&mut self, spec: &PackageSpec) -> Result<InstallOutcome> {
        let rendered = spec.to_string();
        self.install_log.push(rendered.clone());

        for rule in &mut self.install_failures {
            if !rendered.contains(rule.needle.as_str()) {
                continue;
            }
            match &mut rule.remaining {
                Some(0) => continue,
                Some(n) => *n -= 1,
                None => {}
            }
            return Ok(InstallOutcome::Failed {
                kind: rule.kind,
                detail: format!("mock failure matching '{}'", rule.needle),
            });
        }
        self.apply_install(spec);
        Ok(InstallOutcome::Installed)
    }

    fn uninstall(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            self.uninstall_log.push(name.to_string());
            self.packages.remove(&normalize_name(name));
        }
        Ok(())
    }

    fn installed_version(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self.packages.get(&normalize_name(name)).cloned())
    }

    fn installed_packages(&mut self) -> Result<Vec<InstalledPackage>> {
        Ok(self
            .packages
            .iter()
            .map(|(name, version)| InstalledPackage {
                name: name.clone(),
                version: version.clone(),
            })
            .collect())
    }

    fn eval_json(&mut self, code: &str) -> Result<Option<serde_json::Value>> {
        self.eval_log.push(code.to_string());
        for (needle, queue) in &mut self.eval_queues {
            if code.contains(needle.as_str()) {
                if let Some(value) = queue.pop_front() {
                    return Ok(Some(value));
                }
            }
        }
        for (needle, value) in &self.eval_rules {
            if code.contains(needle.as_str()) {
                return Ok(Some(value.clone()));
            }
        }
        Ok(None)
    }

    fn cache_purge(&mut self) -> Result<()> {
        self.cache_purges += 1;
        Ok(())
    }

    fn pip_version(&mut self) -> Option<String> {
        self.pip_version.clone()
    }
}
