/// Shown when a search is started without any text.
pub const NO_QUERY_MESSAGE: &str = "Enter a search query";

/// Shown when a page could not be fetched.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error, check your network";

/// Coarse state of the most recent page fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkStatus {
    #[default]
    Idle,
    Loading,
    Success,
    /// The initial page came back empty.
    NotFound,
    Error,
}

/// Status plus the message a front end should display for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkState {
    pub status: NetworkStatus,
    pub message: Option<String>,
}

impl NetworkState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            status: NetworkStatus::Loading,
            message: None,
        }
    }

    pub fn success() -> Self {
        Self {
            status: NetworkStatus::Success,
            message: None,
        }
    }

    pub fn not_found(query: &str) -> Self {
        Self {
            status: NetworkStatus::NotFound,
            message: Some(format!("Nothing found for \"{}\"", query)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: NetworkStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == NetworkStatus::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_quotes_query() {
        let state = NetworkState::not_found("zzzz");
        assert_eq!(state.status, NetworkStatus::NotFound);
        assert_eq!(state.message.as_deref(), Some("Nothing found for \"zzzz\""));
    }

    #[test]
    fn test_idle_has_no_message() {
        assert_eq!(NetworkState::idle().message, None);
        assert!(NetworkState::loading().is_loading());
        assert!(!NetworkState::success().is_loading());
    }
}
