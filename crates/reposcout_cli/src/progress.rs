//! Progress reporting for search paging.
//!
//! This module provides two modes of progress reporting:
//! - Interactive mode (TTY): a spinner while a page loads, using indicatif
//! - Logging mode (non-TTY): Structured logging using tracing

mod interactive;
mod logging;

use console::Term;
use reposcout::NetworkState;

pub use interactive::InteractiveReporter;
pub use logging::LoggingReporter;

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Spinner and colored messages for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    /// Report the network state after a search request changed it.
    pub fn status(&self, query: &str, state: &NetworkState) {
        match self {
            Self::Interactive(r) => r.status(query, state),
            Self::Logging(r) => r.status(query, state),
        }
    }

    /// Report a page that arrived.
    pub fn page_loaded(&self, page: usize, count: usize, total: usize) {
        match self {
            Self::Interactive(r) => r.page_loaded(page, count, total),
            Self::Logging(r) => r.page_loaded(page, count, total),
        }
    }

    /// Clear the spinner (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
