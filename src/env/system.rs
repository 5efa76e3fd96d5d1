//! Production [`PythonEnv`] backed by a real interpreter.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pip::{InstallOutcome, InstalledPackage, PackageSpec, PipClient};
use crate::shell::{self, CommandOptions};

use super::PythonEnv;

/// Shells out to the configured interpreter for every operation.
#[derive(Debug, Clone)]
pub struct SystemPythonEnv {
    python: PathBuf,
    pip: PipClient,
}

impl SystemPythonEnv {
    /// Environment for the given interpreter path or command name.
    pub fn new(python: impl Into<PathBuf>) -> Self {
        let python = python.into();
        let pip = PipClient::new(&python);
        Self { python, pip }
    }

    /// Override the pip install timeout.
    pub fn with_install_timeout(mut self, secs: u64) -> Self {
        self.pip = self.pip.clone().with_timeout(secs);
        self
    }

    /// The interpreter path.
    pub fn python(&self) -> &Path {
        &self.python
    }
}

impl PythonEnv for SystemPythonEnv {
    fn install(&mut self, spec: &PackageSpec) -> Result<InstallOutcome> {
        self.pip.install(spec)
    }

    fn uninstall(&mut self, names: &[&str]) -> Result<()> {
        self.pip.uninstall(names)
    }

    fn installed_version(&mut self, name: &str) -> Result<Option<String>> {
        self.pip.installed_version(name)
    }

    fn installed_packages(&mut self) -> Result<Vec<InstalledPackage>> {
        self.pip.list()
    }

    fn eval_json(&mut self, code: &str) -> Result<Option<serde_json::Value>> {
        let args = shell::argv(&["-c", code]);
        let result = match shell::run(
            &self.python.to_string_lossy(),
            &args,
            &CommandOptions::default(),
        ) {
            Ok(result) => result,
            // A missing interpreter is a probe answer, not a crash.
            Err(crate::error::SdfixError::CommandFailed { .. }) => {
                tracing::debug!(python = %self.python.display(), "interpreter not runnable");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        if !result.success {
            tracing::debug!(exit = ?result.exit_code, "python eval exited non-zero");
            return Ok(None);
        }
        match serde_json::from_str(result.stdout.trim()) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!(error = %e, "python eval printed non-JSON output");
                Ok(None)
            }
        }
    }

    fn cache_purge(&mut self) -> Result<()> {
        self.pip.cache_purge()
    }

    fn pip_version(&mut self) -> Option<String> {
        self.pip.version()
    }
}
