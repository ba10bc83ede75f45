//! GitHub API error types.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use thiserror::Error;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GitHubError {
    /// Returns true for failures that are worth retrying after a delay.
    pub fn is_retryable(&self) -> bool {
        match self {
            GitHubError::RateLimited { .. } => true,
            GitHubError::Http(e) => e.is_timeout() || e.is_connect(),
            GitHubError::Api(e) => is_rate_limit_error(e),
            _ => false,
        }
    }
}

/// Check if an octocrab error indicates a rate limit (403/429).
pub fn is_rate_limit_error(e: &octocrab::Error) -> bool {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            status == 403 || status == 429
        }
        _ => false,
    }
}

/// Map an octocrab error for `route`, turning 401 and 404 into typed variants.
pub(crate) fn from_octocrab(e: octocrab::Error, route: &str) -> GitHubError {
    if let octocrab::Error::GitHub { source, .. } = &e {
        match source.status_code.as_u16() {
            401 => return GitHubError::AuthRequired,
            404 => return GitHubError::RepoNotFound(route.to_string()),
            _ => {}
        }
    }
    GitHubError::Api(e)
}

/// Classify a non-success response from a raw REST call.
///
/// `body` is the response text and is only used for the error message.
pub fn classify_status(status: StatusCode, headers: &HeaderMap, body: &str) -> GitHubError {
    match status {
        StatusCode::UNAUTHORIZED => GitHubError::AuthRequired,
        StatusCode::TOO_MANY_REQUESTS => GitHubError::RateLimited {
            reset_at: rate_limit_reset(headers),
        },
        StatusCode::FORBIDDEN => {
            let exhausted = header_str(headers, "x-ratelimit-remaining") == Some("0")
                || headers.contains_key("retry-after");
            if exhausted {
                GitHubError::RateLimited {
                    reset_at: rate_limit_reset(headers),
                }
            } else {
                GitHubError::AuthRequired
            }
        }
        StatusCode::NOT_FOUND => GitHubError::RepoNotFound(api_message(body)),
        StatusCode::UNPROCESSABLE_ENTITY => GitHubError::InvalidQuery(api_message(body)),
        _ => GitHubError::Internal(format!("Unexpected HTTP status: {}", status)),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// When the current rate limit window ends, from `x-ratelimit-reset` or
/// `retry-after`, defaulting to now.
fn rate_limit_reset(headers: &HeaderMap) -> DateTime<Utc> {
    if let Some(reset) = header_str(headers, "x-ratelimit-reset").and_then(|v| v.parse().ok())
        && let Some(at) = DateTime::from_timestamp(reset, 0)
    {
        return at;
    }

    header_str(headers, "retry-after")
        .and_then(|v| v.parse::<i64>().ok())
        .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
        .unwrap_or_else(Utc::now)
}

/// Pull GitHub's `message` field out of an error body, falling back to the
/// raw text.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message, which is useful for errors
/// that include multi-line details.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}
