//! Terminal output, prompts, and spinners.
//!
//! The [`UserInterface`] trait keeps command logic testable: production code
//! gets [`TerminalUI`] (console styling, dialoguer confirms, indicatif
//! spinners), tests get [`MockUI`], which captures everything.

pub mod mock;
pub mod output;
pub mod terminal;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};

use crate::error::Result;

/// Trait for user interface interactions.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question. Non-interactive implementations return the
    /// default without asking.
    fn confirm(&mut self, key: &str, question: &str, default: bool) -> Result<bool>;

    /// Start a spinner for a long-running operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped / not needed.
    fn finish_skipped(&mut self, msg: &str);
}
