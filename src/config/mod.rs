//! `.sdfix.yml` loading and resolution.
//!
//! Every field is optional; CLI flags override file values, file values
//! override defaults. The interpreter default prefers the WebUI's own venv
//! when one exists under the install root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdfixError};
use crate::fixes::FixOptions;
use crate::pip::INSTALL_TIMEOUT_SECS;

/// Config filename looked up in the install root.
pub const CONFIG_FILENAME: &str = ".sdfix.yml";

/// Raw file contents; everything optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// WebUI install root (defaults to the current directory).
    pub root: Option<PathBuf>,
    /// Python interpreter path or command name.
    pub python: Option<String>,
    /// CUDA wheel index names in preference order.
    pub cuda_indexes: Option<Vec<String>>,
    /// pip install timeout in seconds.
    pub install_timeout_secs: Option<u64>,
    /// VAE filename for the vae-artifacts fix.
    pub preferred_vae: Option<String>,
}

impl FileConfig {
    /// Load from `<dir>/.sdfix.yml`. A missing file is the default config.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)?;
        serde_yaml::from_str(&text).map_err(|e| SdfixError::ConfigParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Fully resolved settings the commands run with.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub python: String,
    pub cuda_indexes: Vec<String>,
    pub install_timeout_secs: u64,
    pub preferred_vae: String,
}

impl ResolvedConfig {
    /// Merge CLI overrides, file values, and defaults (in that priority).
    pub fn resolve(
        file: FileConfig,
        cli_root: Option<PathBuf>,
        cli_python: Option<String>,
    ) -> Self {
        let defaults = FixOptions::default();
        let root = cli_root
            .or(file.root)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let python = cli_python
            .or(file.python)
            .unwrap_or_else(|| default_python(&root));

        Self {
            root,
            python,
            cuda_indexes: file.cuda_indexes.unwrap_or(defaults.cuda_indexes),
            install_timeout_secs: file.install_timeout_secs.unwrap_or(INSTALL_TIMEOUT_SECS),
            preferred_vae: file.preferred_vae.unwrap_or(defaults.vae_name),
        }
    }

    /// The [`FixOptions`] slice of this config.
    pub fn fix_options(&self) -> FixOptions {
        FixOptions {
            cuda_indexes: self.cuda_indexes.clone(),
            vae_name: self.preferred_vae.clone(),
        }
    }
}

/// Pick an interpreter for an install root: the WebUI's own venv when
/// present, otherwise whatever `python` resolves to on PATH.
pub fn default_python(root: &Path) -> String {
    let candidates = [
        root.join("venv/Scripts/python.exe"),
        root.join("venv/bin/python"),
    ];
    for candidate in candidates {
        if candidate.exists() {
            return candidate.to_string_lossy().to_string();
        }
    }
    "python".to_string()
}
