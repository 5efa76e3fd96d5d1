//! Launcher template rendering and writing.
//!
//! A launcher is a generated batch/shell script that sets environment
//! variables, assembles `COMMANDLINE_ARGS`, and calls the WebUI's own entry
//! point. The template is declarative — an ordered list of env assignments
//! and flags — and [`LauncherTemplate::render`] is a pure function of it:
//! identical input produces byte-identical output. Flag values are inlined
//! verbatim; nothing is escaped or validated.

pub mod profiles;

pub use profiles::LaunchProfile;

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Target script dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// Windows `cmd` batch file (the WebUI's native launcher style).
    Batch,
    /// POSIX shell script.
    Posix,
}

impl Shell {
    /// The dialect matching the build target.
    pub fn native() -> Self {
        if cfg!(target_os = "windows") {
            Self::Batch
        } else {
            Self::Posix
        }
    }

    /// Conventional launcher file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Batch => "bat",
            Self::Posix => "sh",
        }
    }
}

/// One `COMMANDLINE_ARGS` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchFlag {
    /// Boolean switch (`--no-half`).
    Switch(String),
    /// Flag with a value (`--precision full`).
    Value(String, String),
}

impl LaunchFlag {
    /// A switch. Leading dashes are added if absent.
    pub fn switch(name: impl Into<String>) -> Self {
        Self::Switch(dashed(name.into()))
    }

    /// A flag with a value.
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Value(dashed(name.into()), value.into())
    }

    /// The flag name including dashes.
    pub fn name(&self) -> &str {
        match self {
            Self::Switch(name) | Self::Value(name, _) => name,
        }
    }
}

impl fmt::Display for LaunchFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch(name) => write!(f, "{}", name),
            Self::Value(name, value) => write!(f, "{} {}", name, value),
        }
    }
}

fn dashed(name: String) -> String {
    if name.starts_with('-') {
        name
    } else {
        format!("--{}", name)
    }
}

/// Declarative launcher description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherTemplate {
    shell: Shell,
    title: Option<String>,
    env: Vec<(String, String)>,
    flags: Vec<LaunchFlag>,
    entry: Option<String>,
}

impl LauncherTemplate {
    /// Empty template for a dialect.
    pub fn new(shell: Shell) -> Self {
        Self {
            shell,
            title: None,
            env: Vec::new(),
            flags: Vec::new(),
            entry: None,
        }
    }

    /// Comment line under the header.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append an environment variable assignment. Order is preserved.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Append a flag. Order is preserved; duplicates are kept as given.
    pub fn flag(mut self, flag: LaunchFlag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Override the entry point (defaults to `webui.bat` / `./webui.sh`).
    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// The flags, in order.
    pub fn flags(&self) -> &[LaunchFlag] {
        &self.flags
    }

    /// The joined `COMMANDLINE_ARGS` value.
    pub fn commandline_args(&self) -> String {
        self.flags
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render the launcher text. Pure: no I/O, deterministic.
    pub fn render(&self) -> String {
        let args = self.commandline_args();
        let mut out = String::new();
        match self.shell {
            Shell::Batch => {
                out.push_str("@echo off\r\n");
                if let Some(title) = &self.title {
                    out.push_str(&format!("REM {}\r\n", title));
                }
                for (key, value) in &self.env {
                    out.push_str(&format!("set {}={}\r\n", key, value));
                }
                out.push_str(&format!("set COMMANDLINE_ARGS={}\r\n", args));
                let entry = self.entry.as_deref().unwrap_or("webui.bat");
                out.push_str(&format!("call {} %*\r\n", entry));
            }
            Shell::Posix => {
                out.push_str("#!/usr/bin/env bash\n");
                if let Some(title) = &self.title {
                    out.push_str(&format!("# {}\n", title));
                }
                for (key, value) in &self.env {
                    out.push_str(&format!("export {}={}\n", key, value));
                }
                out.push_str(&format!("export COMMANDLINE_ARGS=\"{}\"\n", args));
                let entry = self.entry.as_deref().unwrap_or("./webui.sh");
                out.push_str(&format!("exec {} \"$@\"\n", entry));
            }
        }
        out
    }

    /// Render and overwrite `path` wholesale. On unix the file is made
    /// executable.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(perms.mode() | 0o755);
            fs::set_permissions(path, perms)?;
        }
        tracing::info!(path = %path.display(), "wrote launcher");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_deterministic() {
        let mk = || {
            LauncherTemplate::new(Shell::Batch)
                .env("SAFETENSORS_FAST_GPU", "1")
                .flag(LaunchFlag::value("precision", "full"))
                .flag(LaunchFlag::switch("no-half"))
        };
        assert_eq!(mk().render(), mk().render());
    }

    #[test]
    fn present_flag_appears_absent_flag_does_not() {
        let template =
            LauncherTemplate::new(Shell::Batch).flag(LaunchFlag::value("precision", "full"));
        let text = template.render();
        assert!(text.contains("--precision full"));
        assert!(!text.contains("--xformers"));
    }

    #[test]
    fn batch_render_shape() {
        let text = LauncherTemplate::new(Shell::Batch)
            .title("Compatible launcher")
            .env("XFORMERS_PACKAGE", "none")
            .flag(LaunchFlag::switch("skip-install"))
            .render();

        assert!(text.starts_with("@echo off\r\n"));
        assert!(text.contains("REM Compatible launcher\r\n"));
        assert!(text.contains("set XFORMERS_PACKAGE=none\r\n"));
        assert!(text.contains("set COMMANDLINE_ARGS=--skip-install\r\n"));
        assert!(text.contains("call webui.bat %*\r\n"));
    }

    #[test]
    fn posix_render_shape() {
        let text = LauncherTemplate::new(Shell::Posix)
            .flag(LaunchFlag::switch("medvram-sdxl"))
            .render();

        assert!(text.starts_with("#!/usr/bin/env bash\n"));
        assert!(text.contains("export COMMANDLINE_ARGS=\"--medvram-sdxl\"\n"));
        assert!(text.contains("exec ./webui.sh \"$@\"\n"));
    }

    #[test]
    fn env_assignments_keep_insertion_order() {
        let text = LauncherTemplate::new(Shell::Batch)
            .env("B", "2")
            .env("A", "1")
            .render();
        let b = text.find("set B=2").unwrap();
        let a = text.find("set A=1").unwrap();
        assert!(b < a);
    }

    #[test]
    fn flag_names_get_dashes_but_existing_dashes_are_kept() {
        assert_eq!(LaunchFlag::switch("no-half").name(), "--no-half");
        assert_eq!(LaunchFlag::switch("--no-half").name(), "--no-half");
    }

    #[test]
    fn flag_values_are_inlined_verbatim() {
        // Contract: no escaping or validation of values.
        let flag = LaunchFlag::value("ckpt", r"models\Stable-diffusion\v1-5.safetensors");
        assert_eq!(
            flag.to_string(),
            r"--ckpt models\Stable-diffusion\v1-5.safetensors"
        );
    }

    #[test]
    fn empty_template_sets_empty_args() {
        let text = LauncherTemplate::new(Shell::Batch).render();
        assert!(text.contains("set COMMANDLINE_ARGS=\r\n"));
    }

    #[test]
    fn custom_entry_point() {
        let text = LauncherTemplate::new(Shell::Posix)
            .entry("./webui-user.sh")
            .render();
        assert!(text.contains("exec ./webui-user.sh"));
    }

    #[test]
    fn write_overwrites_existing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("webui_custom.bat");
        std::fs::write(&path, "old contents").unwrap();

        let template = LauncherTemplate::new(Shell::Batch).flag(LaunchFlag::switch("no-half"));
        template.write(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("old contents"));
        assert!(written.contains("--no-half"));
        assert_eq!(written, template.render());
    }

    #[test]
    fn shell_native_and_extension() {
        assert_eq!(Shell::Batch.extension(), "bat");
        assert_eq!(Shell::Posix.extension(), "sh");
        let _ = Shell::native();
    }
}
