//! User-facing notifications

use crate::host::Notifier;

/// Prints informational messages to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier {
    quiet: bool,
}

impl StderrNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for StderrNotifier {
    fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

/// Records messages for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for MemoryNotifier {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
