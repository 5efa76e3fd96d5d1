//! Terminal [`UserInterface`] implementation.

use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::error::Result;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Create the UI for the process.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(interactive, mode))
}

/// Console-backed UI.
pub struct TerminalUI {
    interactive: bool,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(interactive: bool, mode: OutputMode) -> Self {
        Self { interactive, mode }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{} {}", style("✓").green().bold(), msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{} {}", style("!").yellow().bold(), msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{} {}", style("✗").red().bold(), msg);
    }

    fn confirm(&mut self, _key: &str, question: &str, default: bool) -> Result<bool> {
        if !self.interactive {
            return Ok(default);
        }
        let answer = Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(|e| anyhow::anyhow!("prompt failed: {}", e))?;
        Ok(answer)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if !self.mode.shows_spinners() {
            return Box::new(SilentSpinner);
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Box::new(TerminalSpinner { bar })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!();
            println!("{}", style(title).bold());
            println!("{}", style("─".repeat(title.chars().count())).dim());
        }
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

struct TerminalSpinner {
    bar: ProgressBar,
}

impl SpinnerHandle for TerminalSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("✓").green().bold(), msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("✗").red().bold(), msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.bar
            .finish_with_message(format!("{} {}", style("–").dim(), msg));
    }
}

/// Spinner for quiet mode; swallows everything.
struct SilentSpinner;

impl SpinnerHandle for SilentSpinner {
    fn set_message(&mut self, _msg: &str) {}
    fn finish_success(&mut self, _msg: &str) {}
    fn finish_error(&mut self, _msg: &str) {}
    fn finish_skipped(&mut self, _msg: &str) {}
}
