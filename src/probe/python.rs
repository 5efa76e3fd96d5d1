//! Interpreter probe: version, location, venv, pip availability.

use serde::{Deserialize, Serialize};

use crate::env::PythonEnv;
use crate::error::Result;

/// Python snippet printing the interpreter facts as one JSON document.
/// `base_prefix` differs from `prefix` inside a virtual environment.
const PY_SNIPPET: &str = "import sys, json; print(json.dumps({\
\"version\": \"%d.%d.%d\" % sys.version_info[:3], \
\"executable\": sys.executable, \
\"in_venv\": sys.prefix != getattr(sys, \"base_prefix\", sys.prefix)}))";

/// What we know about the configured interpreter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonReport {
    /// Whether the interpreter could be invoked at all.
    pub available: bool,
    /// `major.minor.patch`, when available.
    pub version: Option<String>,
    /// Resolved executable path, when available.
    pub executable: Option<String>,
    /// Running inside a virtual environment.
    pub in_venv: bool,
    /// `pip --version` text, when pip works.
    pub pip_version: Option<String>,
}

impl PythonReport {
    /// Minor version number, for "Python 3.13 detected" style checks.
    pub fn minor_version(&self) -> Option<u32> {
        let version = self.version.as_deref()?;
        version.split('.').nth(1)?.parse().ok()
    }
}

/// Probe the interpreter. Never errors on a broken interpreter; the report
/// says `available: false` instead.
pub fn probe(env: &mut dyn PythonEnv) -> Result<PythonReport> {
    let value = env.eval_json(PY_SNIPPET)?;
    let pip_version = env.pip_version();

    match value {
        Some(value) => Ok(PythonReport {
            available: true,
            version: value["version"].as_str().map(String::from),
            executable: value["executable"].as_str().map(String::from),
            in_venv: value["in_venv"].as_bool().unwrap_or(false),
            pip_version,
        }),
        None => Ok(PythonReport {
            available: false,
            version: None,
            executable: None,
            in_venv: false,
            pip_version,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;

    #[test]
    fn probe_reads_interpreter_facts() {
        let mut env = MockEnv::new();
        env.set_eval_result(
            "sys.version_info",
            serde_json::json!({
                "version": "3.13.1",
                "executable": "/venv/bin/python",
                "in_venv": true
            }),
        );

        let report = probe(&mut env).unwrap();
        assert!(report.available);
        assert_eq!(report.version.as_deref(), Some("3.13.1"));
        assert_eq!(report.executable.as_deref(), Some("/venv/bin/python"));
        assert!(report.in_venv);
        assert!(report.pip_version.is_some());
    }

    #[test]
    fn probe_broken_interpreter_is_unavailable() {
        let mut env = MockEnv::new();
        env.break_pip();

        let report = probe(&mut env).unwrap();
        assert!(!report.available);
        assert!(report.version.is_none());
        assert!(report.pip_version.is_none());
    }

    #[test]
    fn minor_version_parses() {
        let report = PythonReport {
            available: true,
            version: Some("3.13.1".to_string()),
            executable: None,
            in_venv: false,
            pip_version: None,
        };
        assert_eq!(report.minor_version(), Some(13));
    }

    #[test]
    fn minor_version_none_when_unavailable() {
        let report = PythonReport {
            available: false,
            version: None,
            executable: None,
            in_venv: false,
            pip_version: None,
        };
        assert_eq!(report.minor_version(), None);
    }
}
