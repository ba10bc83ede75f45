use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur while recording or reading visit history.
#[derive(Debug, Error)]
pub enum VisitedError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Visited repository not found: {context}")]
    NotFound { context: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl VisitedError {
    /// Create a NotFound error for an ID lookup.
    pub fn not_found_by_id(id: i64) -> Self {
        Self::NotFound {
            context: format!("id={}", id),
        }
    }

    /// Create a NotFound error for an `owner/name` lookup.
    pub fn not_found_by_name(full_name: &str) -> Self {
        Self::NotFound {
            context: full_name.to_string(),
        }
    }
}

/// Result type alias for visit history operations.
pub type Result<T> = std::result::Result<T, VisitedError>;
