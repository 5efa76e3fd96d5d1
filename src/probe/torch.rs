//! PyTorch/CUDA probe.
//!
//! Read-only attribute queries against the deep-learning runtime: is a
//! GPU-capable build installed, which device, how much memory. The snippet
//! catches its own import failure and reports it in the JSON, so a missing
//! torch is a normal answer rather than an error.

use serde::{Deserialize, Serialize};

use crate::env::PythonEnv;
use crate::error::Result;

/// Python snippet printing the torch facts as one JSON document.
const PY_SNIPPET: &str = r#"import json
try:
    import torch
    cuda = torch.cuda.is_available()
    info = {
        "installed": True,
        "version": torch.__version__,
        "cuda_available": cuda,
        "cuda_version": torch.version.cuda if cuda else None,
        "device_name": torch.cuda.get_device_name(0) if cuda else None,
        "total_vram_gb": round(torch.cuda.get_device_properties(0).total_memory / 1024**3, 1) if cuda else None,
    }
except ImportError:
    info = {"installed": False}
print(json.dumps(info))"#;

/// What we know about the installed PyTorch build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TorchReport {
    /// Whether `import torch` succeeds.
    pub installed: bool,
    /// `torch.__version__` (`2.6.0+cpu`, `2.6.0+cu121`).
    #[serde(default)]
    pub version: Option<String>,
    /// `torch.cuda.is_available()`.
    #[serde(default)]
    pub cuda_available: bool,
    /// `torch.version.cuda` when CUDA works.
    #[serde(default)]
    pub cuda_version: Option<String>,
    /// Device 0 name when CUDA works.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Device 0 total memory in GiB when CUDA works.
    #[serde(default)]
    pub total_vram_gb: Option<f64>,
}

impl TorchReport {
    /// A CPU-only build: torch imports but CUDA is unavailable.
    pub fn is_cpu_only(&self) -> bool {
        self.installed && !self.cuda_available
    }
}

/// Probe torch. An unusable interpreter yields the default (not installed)
/// report rather than an error.
pub fn probe(env: &mut dyn PythonEnv) -> Result<TorchReport> {
    match env.eval_json(PY_SNIPPET)? {
        Some(value) => {
            let report = serde_json::from_value(value)?;
            Ok(report)
        }
        None => Ok(TorchReport::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;

    #[test]
    fn probe_cuda_build() {
        let mut env = MockEnv::new();
        env.set_eval_result(
            "import torch",
            serde_json::json!({
                "installed": true,
                "version": "2.6.0+cu121",
                "cuda_available": true,
                "cuda_version": "12.1",
                "device_name": "NVIDIA GeForce RTX 3080",
                "total_vram_gb": 10.0
            }),
        );

        let report = probe(&mut env).unwrap();
        assert!(report.installed);
        assert!(report.cuda_available);
        assert!(!report.is_cpu_only());
        assert_eq!(report.device_name.as_deref(), Some("NVIDIA GeForce RTX 3080"));
        assert_eq!(report.total_vram_gb, Some(10.0));
    }

    #[test]
    fn probe_cpu_only_build() {
        let mut env = MockEnv::new();
        env.set_eval_result(
            "import torch",
            serde_json::json!({
                "installed": true,
                "version": "2.6.0+cpu",
                "cuda_available": false
            }),
        );

        let report = probe(&mut env).unwrap();
        assert!(report.is_cpu_only());
        assert_eq!(report.version.as_deref(), Some("2.6.0+cpu"));
        assert!(report.cuda_version.is_none());
    }

    #[test]
    fn probe_missing_torch() {
        let mut env = MockEnv::new();
        env.set_eval_result("import torch", serde_json::json!({"installed": false}));

        let report = probe(&mut env).unwrap();
        assert!(!report.installed);
        assert!(!report.is_cpu_only());
    }

    #[test]
    fn probe_broken_interpreter_defaults() {
        let mut env = MockEnv::new();
        let report = probe(&mut env).unwrap();
        assert!(!report.installed);
    }
}
