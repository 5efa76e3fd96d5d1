//! Error types for sdfix operations.
//!
//! This module defines [`SdfixError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SdfixError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `SdfixError::Other`) for unexpected errors
//! - Remediation-level failures are NOT errors: a recovery action that fails
//!   is recorded in the run report and the run continues. `SdfixError` is for
//!   hard failures only (caller misuse, unreadable config, I/O).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sdfix operations.
#[derive(Debug, Error)]
pub enum SdfixError {
    /// Configuration file exists but could not be parsed.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The requested concern is not registered.
    #[error("Unknown concern: {name}")]
    UnknownConcern { name: String },

    /// The WebUI install root does not look like a WebUI checkout.
    #[error("Not a WebUI install root: {path} ({message})")]
    InvalidInstallRoot { path: PathBuf, message: String },

    /// A subprocess could not be spawned or was killed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A subprocess exceeded its timeout and was killed.
    #[error("Command timed out after {timeout_secs}s: {command}")]
    CommandTimeout { command: String, timeout_secs: u64 },

    /// The configured Python interpreter is missing or unusable.
    #[error("Python interpreter unusable ({python}): {message}")]
    PythonUnavailable { python: String, message: String },

    /// A probe produced output that could not be parsed.
    #[error("Failed to parse {source_name} output: {message}")]
    ProbeParseError {
        source_name: String,
        message: String,
    },

    /// ui-config.json exists but is not a flat JSON object.
    #[error("Invalid ui-config at {path}: {message}")]
    UiConfigInvalid { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for sdfix operations.
pub type Result<T> = std::result::Result<T, SdfixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = SdfixError::ConfigParseError {
            path: PathBuf::from("/webui/.sdfix.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/webui/.sdfix.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn unknown_concern_displays_name() {
        let err = SdfixError::UnknownConcern {
            name: "frobnicator".into(),
        };
        assert!(err.to_string().contains("frobnicator"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SdfixError::CommandFailed {
            command: "python -m pip install torch".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("pip install torch"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn command_timeout_displays_seconds() {
        let err = SdfixError::CommandTimeout {
            command: "pip install xformers".into(),
            timeout_secs: 300,
        };
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn invalid_install_root_displays_path() {
        let err = SdfixError::InvalidInstallRoot {
            path: PathBuf::from("/tmp/nowhere"),
            message: "webui.py not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/nowhere"));
        assert!(msg.contains("webui.py"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SdfixError = io_err.into();
        assert!(matches!(err, SdfixError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(SdfixError::UnknownConcern {
                name: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
