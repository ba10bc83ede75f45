//! GitHub API access for repository search.
//!
//! # Module Structure
//!
//! - `error` - Error types and HTTP status classification
//! - `types` - Response bodies and pagination metadata
//! - `client` - The [`GitHubClient`] and Link header parsing
//! - `convert` - Conversion to [`crate::search::SearchItem`]
//! - [`oauth`] - OAuth device flow for `reposcout login`

mod client;
mod convert;
mod error;
pub mod oauth;
mod types;

pub use error::{GitHubError, classify_status, is_rate_limit_error, short_error_message};

pub use types::{
    AuthenticatedUser, GitHubOwner, GitHubRepo, LinkPagination, MAX_PER_PAGE, SEARCH_RESULT_CAP,
    SearchPage, SearchResponse,
};

pub use client::{DEFAULT_API_URL, GitHubClient, create_client, parse_link_header};

pub use convert::to_search_item;
