//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Confirm answers can be scripted
//! per prompt key.
//!
//! # Example
//!
//! ```
//! use sdfix::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_confirm_response("apply_fixes", false);
//!
//! ui.message("Probing environment");
//! assert!(ui.has_message("Probing"));
//! assert!(!ui.confirm("apply_fixes", "Apply?", true).unwrap());
//! ```

use std::collections::HashMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    confirm_responses: HashMap<String, bool>,
    confirms_shown: Vec<String>,
    spinner_log: Rc<RefCell<Vec<String>>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Script a confirm answer for a prompt key. Unscripted confirms
    /// return their default.
    pub fn set_confirm_response(&mut self, key: &str, answer: bool) {
        self.confirm_responses.insert(key.to_string(), answer);
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Confirm keys shown, in order.
    pub fn confirms_shown(&self) -> &[String] {
        &self.confirms_shown
    }

    /// Everything spinners recorded (start/finish lines).
    pub fn spinner_log(&self) -> Vec<String> {
        self.spinner_log.borrow().clone()
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, key: &str, _question: &str, default: bool) -> Result<bool> {
        self.confirms_shown.push(key.to_string());
        Ok(self.confirm_responses.get(key).copied().unwrap_or(default))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let log = Rc::clone(&self.spinner_log);
        log.borrow_mut().push(format!("start: {}", message));
        Box::new(MockSpinner { log })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner that records into the owning mock's log.
pub struct MockSpinner {
    log: Rc<RefCell<Vec<String>>>,
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.log.borrow_mut().push(format!("message: {}", msg));
    }

    fn finish_success(&mut self, msg: &str) {
        self.log.borrow_mut().push(format!("success: {}", msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.log.borrow_mut().push(format!("error: {}", msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.log.borrow_mut().push(format!("skipped: {}", msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages_by_kind() {
        let mut ui = MockUI::new();
        ui.message("probing");
        ui.success("fixed");
        ui.warning("drift");
        ui.error("broken");
        ui.show_header("Diagnosis");

        assert!(ui.has_message("probing"));
        assert!(ui.has_success("fixed"));
        assert!(ui.has_warning("drift"));
        assert!(ui.has_error("broken"));
        assert_eq!(ui.headers(), &["Diagnosis"]);
    }

    #[test]
    fn scripted_confirm_overrides_default() {
        let mut ui = MockUI::new();
        ui.set_confirm_response("apply", false);
        assert!(!ui.confirm("apply", "Apply?", true).unwrap());
        assert!(ui.confirms_shown().contains(&"apply".to_string()));
    }

    #[test]
    fn unscripted_confirm_returns_default() {
        let mut ui = MockUI::new();
        assert!(ui.confirm("anything", "?", true).unwrap());
        assert!(!ui.confirm("anything", "?", false).unwrap());
    }

    #[test]
    fn spinner_interactions_are_logged() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("running torch-cuda");
        spinner.set_message("trying cu118");
        spinner.finish_success("fixed via cu118");

        let log = ui.spinner_log();
        assert_eq!(log[0], "start: running torch-cuda");
        assert_eq!(log[2], "success: fixed via cu118");
    }
}
