//! sdfix - Diagnostics and remediation for local Stable Diffusion WebUI installs.
//!
//! sdfix replaces a drawer full of one-shot troubleshooting scripts with a
//! single CLI: probe the Python/PyTorch/CUDA environment, run ordered recovery
//! actions for a named concern until one verifies, write launcher and config
//! artifacts, and print a summary. Failed fixes are reported, never fatal.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`concern`] - Recovery action registry and runner
//! - [`config`] - `.sdfix.yml` loading and resolution
//! - [`env`] - Host Python environment surface (install/uninstall/probe)
//! - [`error`] - Error types and result aliases
//! - [`fixes`] - Built-in concerns for known WebUI breakage
//! - [`launcher`] - Launcher template rendering and writing
//! - [`patch`] - In-place patches to WebUI source files
//! - [`pip`] - `python -m pip` subprocess wrapper
//! - [`probe`] - Read-only environment probes
//! - [`shell`] - Subprocess execution
//! - [`state`] - Remediation run history
//! - [`ui`] - Terminal output, prompts, and spinners
//! - [`uiconfig`] - The WebUI's flat `ui-config.json` map
//!
//! # Example
//!
//! ```
//! use sdfix::launcher::{LaunchFlag, LauncherTemplate, Shell};
//!
//! let template = LauncherTemplate::new(Shell::Batch)
//!     .flag(LaunchFlag::value("precision", "full"))
//!     .flag(LaunchFlag::switch("no-half"));
//! let text = template.render();
//! assert!(text.contains("--precision full"));
//! assert!(text.contains("--no-half"));
//! ```

pub mod cli;
pub mod concern;
pub mod config;
pub mod env;
pub mod error;
pub mod fixes;
pub mod launcher;
pub mod patch;
pub mod pip;
pub mod probe;
pub mod shell;
pub mod state;
pub mod ui;
pub mod uiconfig;

pub use error::{Result, SdfixError};
