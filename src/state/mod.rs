//! Remediation run history.
//!
//! Each `fix` run appends one record per concern to a JSON state file under
//! the user state directory, keyed by a hash of the canonical install root.
//! `sdfix history` reads it back. Retention is capped; oldest records fall
//! off first.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::concern::{ConcernOutcome, ConcernReport};
use crate::error::Result;

/// Current schema version for migration.
pub const CURRENT_VERSION: u32 = 1;

/// Maximum records kept per install.
pub const HISTORY_RETENTION: usize = 200;

/// One concern run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Concern id.
    pub concern: String,
    /// `fixed`, `unfixed`, or `not_needed`.
    pub outcome: String,
    /// The attributed action, when fixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl RunRecord {
    /// Record for a finished concern report, stamped now.
    pub fn from_report(report: &ConcernReport) -> Self {
        let (outcome, action) = match &report.outcome {
            ConcernOutcome::Fixed { action } => ("fixed", Some(action.clone())),
            ConcernOutcome::Unfixed => ("unfixed", None),
            ConcernOutcome::NotNeeded => ("not_needed", None),
        };
        Self {
            timestamp: Utc::now(),
            concern: report.concern.clone(),
            outcome: outcome.to_string(),
            action,
        }
    }
}

/// Persistent state for one install.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateStore {
    /// Schema version.
    pub version: u32,
    /// Canonical install root path, for display.
    pub install_path: String,
    /// Run records, oldest first.
    #[serde(default)]
    pub runs: Vec<RunRecord>,
}

impl StateStore {
    /// Empty store for an install root.
    pub fn new(root: &Path) -> Self {
        Self {
            version: CURRENT_VERSION,
            install_path: root.to_string_lossy().to_string(),
            runs: Vec::new(),
        }
    }

    /// Load from a state file, or start fresh when the file is missing or
    /// unreadable (state is best-effort; it never blocks a fix).
    pub fn load_from(path: &Path, root: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "state file unreadable, starting fresh");
                Self::new(root)
            }),
            Err(_) => Self::new(root),
        }
    }

    /// Save to a state file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Append a record, enforcing retention.
    pub fn record(&mut self, record: RunRecord) {
        self.runs.push(record);
        if self.runs.len() > HISTORY_RETENTION {
            let excess = self.runs.len() - HISTORY_RETENTION;
            self.runs.drain(..excess);
        }
    }

    /// The most recent `n` records, newest first.
    pub fn recent(&self, n: usize) -> Vec<&RunRecord> {
        self.runs.iter().rev().take(n).collect()
    }
}

/// Short content hash identifying an install root.
pub fn install_id(root: &Path) -> String {
    let canonical = root
        .canonicalize()
        .unwrap_or_else(|_| root.to_path_buf());
    let digest = Sha256::digest(canonical.to_string_lossy().as_bytes());
    hex::encode(&digest[..6])
}

/// Default state file path for an install root.
pub fn state_file(root: &Path) -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("sdfix").join(install_id(root)).join("state.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concern::ConcernReport;
    use tempfile::TempDir;

    fn fixed_report() -> ConcernReport {
        ConcernReport {
            concern: "xformers".to_string(),
            title: "Missing attention-optimization extension".to_string(),
            outcome: ConcernOutcome::Fixed {
                action: "pinned-0.0.23".to_string(),
            },
            attempts: vec![],
        }
    }

    #[test]
    fn record_from_fixed_report() {
        let record = RunRecord::from_report(&fixed_report());
        assert_eq!(record.concern, "xformers");
        assert_eq!(record.outcome, "fixed");
        assert_eq!(record.action.as_deref(), Some("pinned-0.0.23"));
    }

    #[test]
    fn record_from_unfixed_report_has_no_action() {
        let mut report = fixed_report();
        report.outcome = ConcernOutcome::Unfixed;
        let record = RunRecord::from_report(&report);
        assert_eq!(record.outcome, "unfixed");
        assert!(record.action.is_none());
    }

    #[test]
    fn save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/state.json");
        let root = Path::new("/webui");

        let mut store = StateStore::new(root);
        store.record(RunRecord::from_report(&fixed_report()));
        store.save_to(&path).unwrap();

        let loaded = StateStore::load_from(&path, root);
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.runs.len(), 1);
        assert_eq!(loaded.runs[0].concern, "xformers");
    }

    #[test]
    fn missing_file_starts_fresh() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::load_from(&temp.path().join("none.json"), Path::new("/webui"));
        assert!(store.runs.is_empty());
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "{broken").unwrap();

        let store = StateStore::load_from(&path, Path::new("/webui"));
        assert!(store.runs.is_empty());
    }

    #[test]
    fn retention_drops_oldest() {
        let mut store = StateStore::new(Path::new("/webui"));
        for i in 0..(HISTORY_RETENTION + 10) {
            let mut record = RunRecord::from_report(&fixed_report());
            record.concern = format!("concern-{}", i);
            store.record(record);
        }
        assert_eq!(store.runs.len(), HISTORY_RETENTION);
        assert_eq!(store.runs[0].concern, "concern-10");
    }

    #[test]
    fn recent_returns_newest_first() {
        let mut store = StateStore::new(Path::new("/webui"));
        for name in ["first", "second", "third"] {
            let mut record = RunRecord::from_report(&fixed_report());
            record.concern = name.to_string();
            store.record(record);
        }
        let recent = store.recent(2);
        assert_eq!(recent[0].concern, "third");
        assert_eq!(recent[1].concern, "second");
    }

    #[test]
    fn install_id_is_stable_and_short() {
        let temp = TempDir::new().unwrap();
        let a = install_id(temp.path());
        let b = install_id(temp.path());
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn different_roots_get_different_ids() {
        let temp_a = TempDir::new().unwrap();
        let temp_b = TempDir::new().unwrap();
        assert_ne!(install_id(temp_a.path()), install_id(temp_b.path()));
    }

    #[test]
    fn state_file_is_under_install_id() {
        let temp = TempDir::new().unwrap();
        let path = state_file(temp.path());
        assert!(path.to_string_lossy().contains(&install_id(temp.path())));
        assert!(path.ends_with("state.json"));
    }
}
