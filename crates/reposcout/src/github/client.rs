//! GitHub API client for repository search.

use std::sync::Arc;

use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::StatusCode;

use super::convert::to_search_item;
use super::error::{GitHubError, classify_status, from_octocrab};
use super::types::{
    AuthenticatedUser, GitHubRepo, LinkPagination, MAX_PER_PAGE, SearchPage, SearchResponse,
};
use crate::paging::PageToken;
use crate::search::{RepositorySearch, SearchQuery, SearchResults};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/search/repositories?q=rust&page=2>; rel="next", <...&page=34>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let part = part.trim();

        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel)
            && let Some(page_num) = extract_page_from_url(url)
        {
            match rel_type {
                "last" => info.last_page = Some(page_num),
                "next" => info.next_page = Some(page_num),
                _ => {}
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let query_start = url.find('?')?;
    let query = &url[query_start + 1..];

    for param in query.split('&') {
        if let Some(value) = param.strip_prefix("page=") {
            return value.parse().ok();
        }
    }

    None
}

/// Create an Octocrab instance for `api_url`, authenticated when a token is given.
pub fn create_client(token: Option<&str>, api_url: &str) -> Result<Octocrab, GitHubError> {
    let mut builder = Octocrab::builder().base_uri(api_url)?;
    if let Some(token) = token {
        builder = builder.personal_token(token.to_string());
    }
    builder.build().map_err(GitHubError::Api)
}

/// GitHub API client.
///
/// Search goes through a plain `reqwest` client so the Link header is
/// available for pagination; everything else goes through Octocrab.
#[derive(Clone)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
    token: Option<Arc<String>>,
    http_client: reqwest::Client,
    api_url: Arc<String>,
}

impl GitHubClient {
    /// Create a client for api.github.com authenticated with `token`.
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        Self::with_api_url(Some(token), DEFAULT_API_URL)
    }

    /// Create a client without credentials.
    ///
    /// Anonymous search works but is heavily rate limited.
    pub fn anonymous() -> Result<Self, GitHubError> {
        Self::with_api_url(None, DEFAULT_API_URL)
    }

    /// Create a client for a specific API root (e.g. GitHub Enterprise).
    pub fn with_api_url(token: Option<&str>, api_url: &str) -> Result<Self, GitHubError> {
        let api_url = api_url.trim_end_matches('/');
        let client = create_client(token, api_url)?;
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("reposcout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(client),
            token: token.map(|t| Arc::new(t.to_string())),
            http_client,
            api_url: Arc::new(api_url.to_string()),
        })
    }

    /// Get a reference to the inner Octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.inner
    }

    /// API root this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Whether requests carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Search repositories.
    ///
    /// `page` is 1-based. `per_page` is clamped to GitHub's accepted range.
    pub async fn search_repositories(
        &self,
        query: &SearchQuery,
        page: PageToken,
        per_page: u32,
    ) -> Result<SearchPage, GitHubError> {
        if query.is_blank() {
            return Err(GitHubError::InvalidQuery("query is empty".to_string()));
        }

        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);

        let mut params = vec![
            ("q", query.text().to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(sort) = query.sort() {
            params.push(("sort", sort.as_str().to_string()));
            params.push(("order", "desc".to_string()));
        }

        let url = format!("{}/search/repositories", self.api_url);
        let mut request = self
            .http_client
            .get(&url)
            .query(&params)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &headers, &body));
        }

        let pagination = headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header);

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::Internal(format!("JSON parse error: {}", e)))?;

        if body.incomplete_results {
            tracing::debug!(query = %query.text(), page, "GitHub returned incomplete results");
        }

        Ok(SearchPage {
            items: body.items,
            total_count: body.total_count,
            incomplete_results: body.incomplete_results,
            pagination,
        })
    }

    /// Fetch a single repository by owner and name.
    pub async fn get_repository(&self, owner: &str, name: &str) -> Result<GitHubRepo, GitHubError> {
        let route = format!("/repos/{}/{}", owner, name);
        self.inner
            .get(&route, None::<&()>)
            .await
            .map_err(|e| from_octocrab(e, &format!("{}/{}", owner, name)))
    }

    /// Fetch the user the token belongs to.
    pub async fn current_user(&self) -> Result<AuthenticatedUser, GitHubError> {
        if !self.is_authenticated() {
            return Err(GitHubError::AuthRequired);
        }

        self.inner
            .get("/user", None::<&()>)
            .await
            .map_err(|e| from_octocrab(e, "user"))
    }
}

#[async_trait]
impl RepositorySearch for GitHubClient {
    async fn search(
        &self,
        query: &SearchQuery,
        page: PageToken,
        per_page: u32,
    ) -> Result<SearchResults, GitHubError> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let result = self.search_repositories(query, page, per_page).await?;
        let next_page = result.next_page(page, per_page);

        Ok(SearchResults {
            items: result.items.iter().map(to_search_item).collect(),
            total_count: result.total_count,
            next_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_client_implements_search() {
        fn assert_search<T: RepositorySearch>() {}
        assert_search::<GitHubClient>();
    }

    #[test]
    fn test_parse_link_header_full() {
        let header = r#"<https://api.github.com/search/repositories?q=rust&per_page=30&page=2>; rel="next", <https://api.github.com/search/repositories?q=rust&per_page=30&page=34>; rel="last""#;

        let info = parse_link_header(header);
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.last_page, Some(34));
        assert_eq!(info.total_pages(), Some(34));
    }

    #[test]
    fn test_parse_link_header_on_last_page() {
        let header = r#"<https://api.github.com/search/repositories?q=rust&page=33>; rel="prev", <https://api.github.com/search/repositories?q=rust&page=1>; rel="first""#;

        let info = parse_link_header(header);
        assert_eq!(info.next_page, None);
        assert_eq!(info.last_page, None);
    }

    #[test]
    fn test_parse_link_header_empty() {
        let info = parse_link_header("");
        assert_eq!(info, LinkPagination::default());
    }

    #[test]
    fn test_extract_page_from_url() {
        assert_eq!(
            extract_page_from_url("https://api.github.com/search/repositories?q=x&page=5"),
            Some(5)
        );
        assert_eq!(
            extract_page_from_url("https://api.github.com/search/repositories?per_page=100&page=3"),
            Some(3)
        );
        assert_eq!(
            extract_page_from_url("https://api.github.com/search/repositories?per_page=100"),
            None
        );
        assert_eq!(extract_page_from_url("https://api.github.com/user"), None);
    }

    #[tokio::test]
    async fn test_client_construction() {
        let client = GitHubClient::with_api_url(Some("ghp_test"), "https://ghe.example.com/api/v3/")
            .expect("client should build");
        assert_eq!(client.api_url(), "https://ghe.example.com/api/v3");
        assert!(client.is_authenticated());

        let anonymous = GitHubClient::anonymous().expect("client should build");
        assert!(!anonymous.is_authenticated());
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_any_request() {
        let client = GitHubClient::anonymous().expect("client should build");
        let err = client
            .search_repositories(&SearchQuery::new("   "), 1, 30)
            .await
            .expect_err("blank query should fail");
        assert!(matches!(err, GitHubError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_current_user_requires_token() {
        let client = GitHubClient::anonymous().expect("client should build");
        let err = client.current_user().await.expect_err("should fail");
        assert!(matches!(err, GitHubError::AuthRequired));
    }
}
