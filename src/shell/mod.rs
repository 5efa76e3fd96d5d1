//! Subprocess execution.
//!
//! All external work (pip, python probes, nvidia-smi) goes through
//! [`run`]: blocking, captured output, optional timeout. Commands are
//! argv vectors rather than shell strings so package names and index URLs
//! never pass through a shell.

use crate::error::{Result, SdfixError};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Timeout in seconds (None = no timeout).
    pub timeout: Option<u64>,
}

impl CommandOptions {
    /// Options with a timeout and nothing else.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout: Some(timeout_secs),
            ..Default::default()
        }
    }
}

/// Render an argv vector for error messages and logs.
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

/// Execute a command, capturing stdout and stderr.
///
/// A non-zero exit is NOT an error — it returns a `CommandResult` with
/// `success: false` so callers can inspect stderr. Errors are reserved for
/// spawn failures and timeouts.
pub fn run(program: &str, args: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let rendered = display_command(program, args);

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|_| SdfixError::CommandFailed {
        command: rendered.clone(),
        code: None,
    })?;

    // Drain pipes on threads so a chatty child can't fill its pipe buffer
    // and deadlock against the timeout poll below.
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();

    let stdout_handle = thread::spawn(move || {
        let mut buf = String::new();
        if let Some(pipe) = stdout_pipe.as_mut() {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    });
    let stderr_handle = thread::spawn(move || {
        let mut buf = String::new();
        if let Some(pipe) = stderr_pipe.as_mut() {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    });

    let deadline = options.timeout.map(|t| start + Duration::from_secs(t));
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        // Unblock the reader threads before returning.
                        let _ = stdout_handle.join();
                        let _ = stderr_handle.join();
                        return Err(SdfixError::CommandTimeout {
                            command: rendered,
                            timeout_secs: options.timeout.unwrap_or_default(),
                        });
                    }
                }
                thread::sleep(Duration::from_millis(50));
            }
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    let duration = start.elapsed();

    tracing::debug!(
        command = %rendered,
        exit = ?status.code(),
        secs = duration.as_secs(),
        "command finished"
    );

    Ok(CommandResult {
        exit_code: status.code(),
        stdout,
        stderr,
        duration,
        success: status.success(),
    })
}

/// Execute a command and return success/failure, swallowing spawn errors.
pub fn run_check(program: &str, args: &[String]) -> bool {
    run(program, args, &CommandOptions::default())
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Convenience for argv construction from string literals.
pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> (String, Vec<String>) {
        ("sh".to_string(), argv(&["-c", script]))
    }

    #[test]
    fn run_successful_command() {
        let (prog, args) = sh("echo hello");
        let result = run(&prog, &args, &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn run_failing_command_is_not_an_error() {
        let (prog, args) = sh("echo oops >&2; exit 3");
        let result = run(&prog, &args, &CommandOptions::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn run_missing_program_is_an_error() {
        let result = run(
            "definitely-not-a-real-binary-sdfix",
            &[],
            &CommandOptions::default(),
        );
        assert!(matches!(result, Err(SdfixError::CommandFailed { .. })));
    }

    #[test]
    fn run_with_env() {
        let (prog, args) = sh("echo $MY_VAR");
        let mut options = CommandOptions::default();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = run(&prog, &args, &options).unwrap();
        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn run_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let (prog, args) = sh("pwd");

        let result = run(&prog, &args, &options).unwrap();
        assert!(result.success);
    }

    #[test]
    fn run_times_out() {
        let (prog, args) = sh("sleep 30");
        let options = CommandOptions::with_timeout(1);

        let result = run(&prog, &args, &options);
        assert!(matches!(result, Err(SdfixError::CommandTimeout { .. })));
    }

    #[test]
    fn run_within_timeout_succeeds() {
        let (prog, args) = sh("echo quick");
        let options = CommandOptions::with_timeout(30);

        let result = run(&prog, &args, &options).unwrap();
        assert!(result.success);
    }

    #[test]
    fn run_check_returns_bool() {
        let (prog, args) = sh("exit 0");
        assert!(run_check(&prog, &args));
        let (prog, args) = sh("exit 1");
        assert!(!run_check(&prog, &args));
    }

    #[test]
    fn display_command_joins_parts() {
        let rendered = display_command("python", &argv(&["-m", "pip", "list"]));
        assert_eq!(rendered, "python -m pip list");
    }

    #[test]
    fn command_result_tracks_duration() {
        let (prog, args) = sh("echo fast");
        let result = run(&prog, &args, &CommandOptions::default()).unwrap();
        assert!(result.duration.as_millis() < 5000);
    }
}
