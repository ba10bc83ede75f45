use reposcout::{NetworkState, NetworkStatus};

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn status(&self, query: &str, state: &NetworkState) {
        let message = state.message.as_deref().unwrap_or_default();
        match state.status {
            NetworkStatus::Idle => {}
            NetworkStatus::Loading => tracing::debug!(query = %query, "Searching"),
            NetworkStatus::Success => tracing::debug!(query = %query, "Search page loaded"),
            NetworkStatus::NotFound => tracing::info!(query = %query, "{}", message),
            NetworkStatus::Error => {
                tracing::warn!(query = %query, error = %message, "Search failed")
            }
        }
    }

    pub fn page_loaded(&self, page: usize, count: usize, total: usize) {
        tracing::info!(page, count, total, "Fetched page");
    }
}
