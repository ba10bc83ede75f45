use thiserror::Error;

use crate::auth::AuthError;
use crate::visited::VisitedError;

/// Errors from driving a search session.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("No search has been started")]
    NoActiveSearch,

    #[error("No result at position {0}")]
    NoSuchItem(usize),

    #[error("Could not record visit: {0}")]
    Visited(#[from] VisitedError),
}

/// Result type alias for search session operations.
pub type Result<T> = std::result::Result<T, SearchError>;
