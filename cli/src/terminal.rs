use std::io::{self, Write};

use console_core::screens::{Ui, LOGIN_PATH};

/// `Ui` for a terminal: notifications go to stderr, navigation is tracked
/// and reported only when it matters to the operator.
pub struct TerminalUi {
    location: String,
    err: Box<dyn Write>,
    failed: bool,
}

impl TerminalUi {
    pub fn at(location: &str) -> Self {
        Self::with_writer(location, Box::new(io::stderr()))
    }

    pub fn with_writer(location: &str, err: Box<dyn Write>) -> Self {
        Self {
            location: location.to_string(),
            err,
            failed: false,
        }
    }

    /// Move to `location` without reporting it.
    pub fn enter(&mut self, location: &str) {
        self.location = location.to_string();
    }

    /// Whether any error was reported.
    pub fn failed(&self) -> bool {
        self.failed
    }
}

impl Ui for TerminalUi {
    fn notify_success(&mut self, message: &str) {
        let _ = writeln!(self.err, "ok: {message}");
    }

    fn notify_error(&mut self, message: &str) {
        self.failed = true;
        let _ = writeln!(self.err, "error: {message}");
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn navigate(&mut self, path: &str) {
        if path == LOGIN_PATH {
            let _ = writeln!(self.err, "not signed in; run `admin-console login`");
        }
        self.location = path.to_string();
    }
}
