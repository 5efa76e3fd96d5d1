//! Host Python environment surface.
//!
//! Every remediation effect and runtime probe goes through the [`PythonEnv`]
//! trait: package installs, uninstalls, version lookups, and read-only
//! expression evaluation. Production code uses [`SystemPythonEnv`], which
//! shells out through the pip wrapper; tests use [`MockEnv`], which scripts
//! outcomes and records every call. Keeping the mutation surface behind one
//! trait is what makes recovery actions testable without a package manager.
//!
//! The installed package set is ambient, global, unlocked state. Two
//! concurrent runs race on it with undefined outcome; nothing here prevents
//! or detects that.

pub mod mock;
pub mod system;

pub use mock::MockEnv;
pub use system::SystemPythonEnv;

use crate::error::Result;
use crate::pip::{InstallOutcome, PackageSpec};

/// The injected mutation/probe surface for the host Python environment.
pub trait PythonEnv {
    /// Apply an install described by `spec`. A failed install is an
    /// `Ok(InstallOutcome::Failed { .. })`, never an `Err`.
    fn install(&mut self, spec: &PackageSpec) -> Result<InstallOutcome>;

    /// Uninstall distributions by name. Missing packages are ignored.
    fn uninstall(&mut self, names: &[&str]) -> Result<()>;

    /// The installed version of a distribution, if any.
    fn installed_version(&mut self, name: &str) -> Result<Option<String>>;

    /// All installed distributions.
    fn installed_packages(&mut self) -> Result<Vec<crate::pip::InstalledPackage>>;

    /// Run a Python snippet that prints a single JSON document to stdout and
    /// return the parsed value, or `None` when the interpreter exited
    /// non-zero. Snippets are expected to catch their own import errors and
    /// report them in the JSON.
    fn eval_json(&mut self, code: &str) -> Result<Option<serde_json::Value>>;

    /// Purge pip's wheel cache.
    fn cache_purge(&mut self) -> Result<()>;

    /// `pip --version` text, when pip works at all.
    fn pip_version(&mut self) -> Option<String>;
}
