//! `python -m pip` subprocess wrapper.
//!
//! Exit code 0 means success; on failure the stderr text is inspected
//! best-effort for known substrings to classify what went wrong. A failed
//! install is a value, not an error — callers decide whether to try the next
//! strategy. Nothing here is ever rolled back.

pub mod spec;

pub use spec::{requirement_name, Constraint, PackageSpec};

use crate::error::{Result, SdfixError};
use crate::shell::{self, CommandOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default timeout for installs. Wheel downloads for CUDA builds run to
/// multiple gigabytes; anything past this is considered hung.
pub const INSTALL_TIMEOUT_SECS: u64 = 300;

/// Why an install failed, inferred from pip's stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipFailure {
    /// No wheel or sdist exists for this platform/Python combination.
    NoMatchingDistribution,
    /// The package requires a different Python version.
    PythonVersionUnsupported,
    /// The resolver found conflicting requirements.
    ResolverConflict,
    /// Building from source failed (compiler, cmake, missing headers).
    BuildFailed,
    /// Network or index unreachable.
    NetworkError,
    /// The install exceeded the timeout and was killed.
    TimedOut,
    /// Anything else.
    Other,
}

impl PipFailure {
    /// Best-effort classification of pip stderr.
    pub fn classify(stderr: &str) -> Self {
        if stderr.contains("No matching distribution found")
            || stderr.contains("Could not find a version that satisfies")
        {
            Self::NoMatchingDistribution
        } else if stderr.contains("requires a different Python")
            || stderr.contains("Requires-Python")
        {
            Self::PythonVersionUnsupported
        } else if stderr.contains("ResolutionImpossible")
            || stderr.contains("conflicting dependencies")
        {
            Self::ResolverConflict
        } else if stderr.contains("error: subprocess-exited-with-error")
            || stderr.contains("Failed building wheel")
            || stderr.contains("CMake")
        {
            Self::BuildFailed
        } else if stderr.contains("Connection") || stderr.contains("Temporary failure") {
            Self::NetworkError
        } else {
            Self::Other
        }
    }
}

/// Outcome of one install attempt.
#[derive(Debug, Clone)]
pub enum InstallOutcome {
    /// pip exited 0.
    Installed,
    /// pip exited non-zero or timed out.
    Failed {
        kind: PipFailure,
        /// The last stderr lines, for the report.
        detail: String,
    },
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

/// One row of `pip list --format=json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

/// Blocking pip client bound to one interpreter.
#[derive(Debug, Clone)]
pub struct PipClient {
    python: PathBuf,
    install_timeout: u64,
}

impl PipClient {
    /// Client for the given interpreter.
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            install_timeout: INSTALL_TIMEOUT_SECS,
        }
    }

    /// Override the install timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.install_timeout = secs;
        self
    }

    /// The interpreter this client shells through.
    pub fn python(&self) -> &Path {
        &self.python
    }

    fn python_str(&self) -> String {
        self.python.to_string_lossy().to_string()
    }

    /// Run an install described by `spec`.
    ///
    /// Non-zero exit and timeout both come back as [`InstallOutcome::Failed`];
    /// only spawn failure is an error.
    pub fn install(&self, spec: &PackageSpec) -> Result<InstallOutcome> {
        let mut args = shell::argv(&["-m", "pip", "install"]);
        args.extend(spec.to_args());

        tracing::info!(spec = %spec, "pip install");
        let options = CommandOptions::with_timeout(self.install_timeout);
        match shell::run(&self.python_str(), &args, &options) {
            Ok(result) if result.success => Ok(InstallOutcome::Installed),
            Ok(result) => {
                let kind = PipFailure::classify(&result.stderr);
                tracing::warn!(spec = %spec, ?kind, "pip install failed");
                Ok(InstallOutcome::Failed {
                    kind,
                    detail: tail_lines(&result.stderr, 5),
                })
            }
            Err(SdfixError::CommandTimeout { timeout_secs, .. }) => {
                tracing::warn!(spec = %spec, timeout_secs, "pip install timed out");
                Ok(InstallOutcome::Failed {
                    kind: PipFailure::TimedOut,
                    detail: format!("killed after {}s", timeout_secs),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Uninstall packages. A package that was never installed is not an
    /// error; pip reports it and exits 0 with `-y` on modern versions, and
    /// we ignore a non-zero exit here either way.
    pub fn uninstall(&self, names: &[&str]) -> Result<()> {
        let mut args = shell::argv(&["-m", "pip", "uninstall", "-y"]);
        args.extend(names.iter().map(|n| n.to_string()));

        tracing::info!(packages = ?names, "pip uninstall");
        let result = shell::run(&self.python_str(), &args, &CommandOptions::default())?;
        if !result.success {
            tracing::debug!(stderr = %tail_lines(&result.stderr, 3), "uninstall non-zero exit");
        }
        Ok(())
    }

    /// List installed distributions via `pip list --format=json`.
    pub fn list(&self) -> Result<Vec<InstalledPackage>> {
        let args = shell::argv(&["-m", "pip", "list", "--format=json"]);
        let result = shell::run(&self.python_str(), &args, &CommandOptions::default())?;
        if !result.success {
            return Err(SdfixError::CommandFailed {
                command: format!("{} -m pip list", self.python_str()),
                code: result.exit_code,
            });
        }
        serde_json::from_str(&result.stdout).map_err(|e| SdfixError::ProbeParseError {
            source_name: "pip list".to_string(),
            message: e.to_string(),
        })
    }

    /// The installed version of one distribution, if present. Name matching
    /// is case-insensitive with `-`/`_` folded, per PEP 503.
    pub fn installed_version(&self, name: &str) -> Result<Option<String>> {
        let wanted = normalize_name(name);
        Ok(self
            .list()?
            .into_iter()
            .find(|p| normalize_name(&p.name) == wanted)
            .map(|p| p.version))
    }

    /// Purge pip's wheel cache.
    pub fn cache_purge(&self) -> Result<()> {
        let args = shell::argv(&["-m", "pip", "cache", "purge"]);
        let result = shell::run(&self.python_str(), &args, &CommandOptions::default())?;
        if !result.success {
            tracing::debug!("pip cache purge exited non-zero (cache may be empty)");
        }
        Ok(())
    }

    /// `pip --version` text, or None when pip itself is broken.
    pub fn version(&self) -> Option<String> {
        let args = shell::argv(&["-m", "pip", "--version"]);
        shell::run(&self.python_str(), &args, &CommandOptions::default())
            .ok()
            .filter(|r| r.success)
            .map(|r| r.stdout.trim().to_string())
    }
}

/// Fold a distribution name per PEP 503.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase().replace('_', "-")
}

/// The last `n` non-empty lines of command output.
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
