//! In-place patches to WebUI source files.
//!
//! These are deliberately dumb substring replacements, guarded two ways: a
//! marker string detects an already-patched file, and a `.bak` backup is
//! written before the first modification. No AST awareness — the WebUI
//! version drifting under the patch is an expected outcome and gets its own
//! report variant rather than a guess.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix for backup copies written before the first modification.
pub const BACKUP_SUFFIX: &str = ".sdfix.bak";

/// One substring replacement against one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePatch {
    /// Path relative to the install root (`modules/api/models.py`).
    pub file: String,
    /// Exact text to find (first occurrence is replaced).
    pub find: String,
    /// Replacement text.
    pub replace: String,
    /// Substring whose presence means the file is already patched. Usually a
    /// comment inside `replace`.
    pub marker: String,
}

/// What applying a patch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Replacement written; backup of the original at the given path.
    Applied { backup: PathBuf },
    /// Marker found; nothing modified.
    AlreadyApplied,
    /// The target file does not exist under this root.
    TargetMissing,
    /// File exists but the expected text is absent — the installed WebUI
    /// version differs from the one this patch was written against.
    PatternNotFound,
}

impl SourcePatch {
    /// Apply against an install root. Only I/O failures are errors; every
    /// expected condition is a [`PatchOutcome`].
    pub fn apply(&self, root: &Path) -> Result<PatchOutcome> {
        let target = root.join(&self.file);
        if !target.exists() {
            tracing::warn!(file = %self.file, "patch target missing");
            return Ok(PatchOutcome::TargetMissing);
        }

        let content = fs::read_to_string(&target)?;
        if content.contains(&self.marker) {
            tracing::debug!(file = %self.file, "already patched");
            return Ok(PatchOutcome::AlreadyApplied);
        }
        if !content.contains(&self.find) {
            tracing::warn!(file = %self.file, "patch pattern not found");
            return Ok(PatchOutcome::PatternNotFound);
        }

        let backup = target.with_file_name(format!(
            "{}{}",
            target
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            BACKUP_SUFFIX
        ));
        fs::write(&backup, &content)?;

        let patched = content.replacen(&self.find, &self.replace, 1);
        fs::write(&target, patched)?;
        tracing::info!(file = %self.file, backup = %backup.display(), "patched");

        Ok(PatchOutcome::Applied { backup })
    }

    /// Whether the file under `root` already carries the marker.
    pub fn is_applied(&self, root: &Path) -> bool {
        fs::read_to_string(root.join(&self.file))
            .map(|content| content.contains(&self.marker))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patch() -> SourcePatch {
        SourcePatch {
            file: "modules/api/models.py".to_string(),
            find: "DynamicModel.__config__.allow_population_by_field_name = True".to_string(),
            replace: "# sdfix: pydantic v1/v2 compatibility\n        try:\n            DynamicModel.__config__.allow_population_by_field_name = True\n        except AttributeError:\n            pass".to_string(),
            marker: "sdfix: pydantic v1/v2 compatibility".to_string(),
        }
    }

    fn write_target(root: &Path, content: &str) {
        let target = root.join("modules/api");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("models.py"), content).unwrap();
    }

    #[test]
    fn applies_and_backs_up() {
        let temp = TempDir::new().unwrap();
        let original = "x = 1\n        DynamicModel.__config__.allow_population_by_field_name = True\ny = 2\n";
        write_target(temp.path(), original);

        let outcome = patch().apply(temp.path()).unwrap();
        let backup = match outcome {
            PatchOutcome::Applied { backup } => backup,
            other => panic!("expected Applied, got {:?}", other),
        };

        let patched = fs::read_to_string(temp.path().join("modules/api/models.py")).unwrap();
        assert!(patched.contains("sdfix: pydantic v1/v2 compatibility"));
        assert!(patched.contains("except AttributeError"));

        let saved = fs::read_to_string(&backup).unwrap();
        assert_eq!(saved, original);
    }

    #[test]
    fn second_apply_detects_marker() {
        let temp = TempDir::new().unwrap();
        write_target(
            temp.path(),
            "DynamicModel.__config__.allow_population_by_field_name = True\n",
        );

        let p = patch();
        assert!(matches!(
            p.apply(temp.path()).unwrap(),
            PatchOutcome::Applied { .. }
        ));
        assert!(matches!(
            p.apply(temp.path()).unwrap(),
            PatchOutcome::AlreadyApplied
        ));
        assert!(p.is_applied(temp.path()));
    }

    #[test]
    fn missing_target_reported() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            patch().apply(temp.path()).unwrap(),
            PatchOutcome::TargetMissing
        );
    }

    #[test]
    fn drifted_version_reports_pattern_not_found() {
        let temp = TempDir::new().unwrap();
        write_target(temp.path(), "a completely different models.py\n");

        assert_eq!(
            patch().apply(temp.path()).unwrap(),
            PatchOutcome::PatternNotFound
        );
        // File untouched, no backup left behind.
        assert!(!temp
            .path()
            .join(format!("modules/api/models.py{}", BACKUP_SUFFIX))
            .exists());
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let temp = TempDir::new().unwrap();
        let line = "DynamicModel.__config__.allow_population_by_field_name = True";
        write_target(temp.path(), &format!("{}\n{}\n", line, line));

        patch().apply(temp.path()).unwrap();
        let patched = fs::read_to_string(temp.path().join("modules/api/models.py")).unwrap();
        assert_eq!(patched.matches(line).count(), 2); // replacement keeps the line once, second untouched
        assert_eq!(
            patched.matches("sdfix: pydantic v1/v2 compatibility").count(),
            1
        );
    }

    #[test]
    fn is_applied_false_for_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(!patch().is_applied(temp.path()));
    }
}
