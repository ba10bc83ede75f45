//! GitHub API data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paging::PageToken;

/// Largest `per_page` GitHub accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// GitHub's search API never returns more than this many results per query.
pub const SEARCH_RESULT_CAP: u64 = 1000;

/// Owner of a repository (user or organization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
}

/// A repository as returned by `/search/repositories` and `/repos/{owner}/{repo}`.
///
/// Only the fields reposcout displays or stores are deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub owner: Option<GitHubOwner>,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u32>,
    #[serde(default)]
    pub forks_count: Option<u32>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

/// Body of a `/search/repositories` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<GitHubRepo>,
}

/// The signed-in user, from `/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Email if the user exposes one, otherwise the login.
    pub fn display_handle(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.login)
    }
}

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
    /// The next page number (from rel="next" link).
    pub next_page: Option<u32>,
}

impl LinkPagination {
    /// Returns the total number of pages if known.
    pub fn total_pages(&self) -> Option<u32> {
        self.last_page
    }
}

/// One page of search results together with its pagination metadata.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<GitHubRepo>,
    pub total_count: u64,
    pub incomplete_results: bool,
    /// Parsed Link header, if the response carried one.
    pub pagination: Option<LinkPagination>,
}

impl SearchPage {
    /// Key of the page after `page`, or `None` if this was the last one.
    ///
    /// Prefers the Link header. Without one, falls back to counting results
    /// against `total_count`, capped at [`SEARCH_RESULT_CAP`].
    pub fn next_page(&self, page: PageToken, per_page: u32) -> Option<PageToken> {
        if self.items.is_empty() {
            return None;
        }

        if let Some(link) = &self.pagination {
            return link
                .next_page
                .and_then(|next| PageToken::try_from(next).ok())
                .filter(|next| *next > page);
        }

        let reachable = self.total_count.min(SEARCH_RESULT_CAP);
        let seen = u64::try_from(page).unwrap_or(0) * u64::from(per_page);
        (seen < reachable).then_some(page + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(id: i64) -> GitHubRepo {
        GitHubRepo {
            id,
            name: format!("repo-{id}"),
            full_name: format!("octocat/repo-{id}"),
            owner: Some(GitHubOwner {
                login: "octocat".to_string(),
            }),
            html_url: format!("https://github.com/octocat/repo-{id}"),
            description: None,
            language: None,
            stargazers_count: None,
            forks_count: None,
            updated_at: None,
            archived: false,
            fork: false,
        }
    }

    fn page(count: i64, total: u64, pagination: Option<LinkPagination>) -> SearchPage {
        SearchPage {
            items: (0..count).map(repo).collect(),
            total_count: total,
            incomplete_results: false,
            pagination,
        }
    }

    #[test]
    fn test_search_response_deserialize() {
        let json = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {
                    "id": 1296269,
                    "name": "Hello-World",
                    "full_name": "octocat/Hello-World",
                    "owner": { "login": "octocat", "id": 1 },
                    "html_url": "https://github.com/octocat/Hello-World",
                    "description": "This your first repo!",
                    "language": "Rust",
                    "stargazers_count": 80,
                    "forks_count": 9,
                    "updated_at": "2011-01-26T19:14:43Z",
                    "archived": false,
                    "fork": false,
                    "score": 1.0
                },
                {
                    "id": 2,
                    "name": "sparse",
                    "full_name": "octocat/sparse",
                    "owner": null,
                    "html_url": "https://github.com/octocat/sparse"
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_count, 2);
        assert_eq!(response.items.len(), 2);

        let first = &response.items[0];
        assert_eq!(first.full_name, "octocat/Hello-World");
        assert_eq!(first.owner.as_ref().unwrap().login, "octocat");
        assert_eq!(first.stargazers_count, Some(80));
        assert!(first.updated_at.is_some());

        let sparse = &response.items[1];
        assert!(sparse.owner.is_none());
        assert!(sparse.description.is_none());
        assert!(!sparse.archived);
    }

    #[test]
    fn test_authenticated_user_display_handle() {
        let mut user: AuthenticatedUser =
            serde_json::from_str(r#"{"login":"octocat","name":"The Octocat","email":null}"#)
                .unwrap();
        assert_eq!(user.display_handle(), "octocat");

        user.email = Some("octocat@github.com".to_string());
        assert_eq!(user.display_handle(), "octocat@github.com");
    }

    #[test]
    fn test_next_page_from_link_header() {
        let link = LinkPagination {
            last_page: Some(34),
            next_page: Some(3),
        };
        assert_eq!(page(30, 1000, Some(link)).next_page(2, 30), Some(3));
    }

    #[test]
    fn test_next_page_link_header_without_next_is_last() {
        let link = LinkPagination::default();
        assert_eq!(page(30, 5000, Some(link)).next_page(34, 30), None);
    }

    #[test]
    fn test_next_page_heuristic_without_link_header() {
        assert_eq!(page(30, 100, None).next_page(1, 30), Some(2));
        assert_eq!(page(10, 100, None).next_page(4, 30), None);
    }

    #[test]
    fn test_next_page_respects_search_cap() {
        // 100 * 10 == 1000 results seen; GitHub will not serve page 11.
        assert_eq!(page(100, 250_000, None).next_page(10, 100), None);
        assert_eq!(page(100, 250_000, None).next_page(9, 100), Some(10));
    }

    #[test]
    fn test_next_page_empty_page_is_last() {
        assert_eq!(page(0, 100, None).next_page(1, 30), None);
    }
}
