//! Warning collection for a single build run.
//!
//! Warnings are collected in an explicit value threaded through the pipeline
//! rather than emitted through ambient state, so callers (and tests) can
//! inspect exactly what a run produced. Each warning is also mirrored to the
//! diagnostic stream via `log`.

/// Non-fatal diagnostics accumulated while building an installer.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and echo it to the diagnostic stream.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    /// All warnings recorded so far, in emission order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
