//! Repository search: query, results, and the listener that pages them.
//!
//! [`SearchSession`] ties the pieces together. Each query gets a fresh
//! [`SearchRepository`] (the page listener), wrapped in a
//! [`crate::paging::PagingBridge`] and driven by a
//! [`crate::paging::PagedList`]. Fetch progress and failures are published
//! on a watch channel of [`NetworkState`], since page responses carry no
//! error.

mod error;
mod item;
mod query;
mod repository;
mod session;
mod status;

pub use error::{Result, SearchError};
pub use item::SearchItem;
pub use query::{SearchQuery, SearchSort};
pub use repository::{FIRST_PAGE, RepositorySearch, SearchRepository, SearchResults, VisitedIds};
pub use session::{SearchList, SearchSession};
pub use status::{CONNECTION_ERROR_MESSAGE, NO_QUERY_MESSAGE, NetworkState, NetworkStatus};

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use sea_orm::DatabaseConnection;
    use tokio::runtime::Handle;

    use super::*;
    use crate::auth::{AuthError, AuthSession};
    use crate::github::{AuthenticatedUser, GitHubError};
    use crate::paging::{LoadState, PageToken};
    use crate::retry::RetryConfig;

    fn item(id: i64) -> SearchItem {
        SearchItem {
            id,
            name: format!("repo-{id}"),
            owner: "octocat".to_string(),
            full_name: format!("octocat/repo-{id}"),
            html_url: format!("https://github.com/octocat/repo-{id}"),
            description: None,
            language: Some("Rust".to_string()),
            stars: Some(id as u32),
            visited: false,
        }
    }

    #[derive(Default)]
    struct StubSearch {
        pages: HashMap<PageToken, SearchResults>,
        failure: Option<fn() -> GitHubError>,
        calls: Mutex<Vec<(String, PageToken, u32)>>,
    }

    impl StubSearch {
        fn two_pages() -> Self {
            Self {
                pages: HashMap::from([
                    (
                        1,
                        SearchResults {
                            items: vec![item(1), item(2)],
                            total_count: 3,
                            next_page: Some(2),
                        },
                    ),
                    (
                        2,
                        SearchResults {
                            items: vec![item(3)],
                            total_count: 3,
                            next_page: None,
                        },
                    ),
                ]),
                ..Default::default()
            }
        }

        fn failing(failure: fn() -> GitHubError) -> Self {
            Self {
                failure: Some(failure),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, PageToken, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RepositorySearch for StubSearch {
        async fn search(
            &self,
            query: &SearchQuery,
            page: PageToken,
            per_page: u32,
        ) -> std::result::Result<SearchResults, GitHubError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.text().to_string(), page, per_page));
            if let Some(failure) = self.failure {
                return Err(failure());
            }
            Ok(self.pages.get(&page).cloned().unwrap_or_default())
        }
    }

    fn signed_in() -> AuthSession {
        let auth = AuthSession::new();
        auth.sign_in(AuthenticatedUser {
            login: "octocat".to_string(),
            name: None,
            email: None,
        });
        auth
    }

    fn session(client: Arc<StubSearch>) -> SearchSession<StubSearch> {
        SearchSession::new(client, signed_in(), Handle::current())
            .with_retry_config(RetryConfig::disabled())
    }

    #[tokio::test]
    async fn test_set_query_requires_sign_in() {
        let client = Arc::new(StubSearch::two_pages());
        let mut session =
            SearchSession::new(Arc::clone(&client), AuthSession::new(), Handle::current());

        assert!(matches!(
            session.set_query("tokio"),
            Err(SearchError::Auth(AuthError::Unverified))
        ));

        session.auth().sign_out();
        assert!(matches!(
            session.set_query("tokio"),
            Err(SearchError::Auth(AuthError::NotAuthenticated))
        ));
        assert!(session.list().is_none());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_pages_through_all_results() {
        let client = Arc::new(StubSearch::two_pages());
        let mut session = session(Arc::clone(&client));

        let list = session.set_query("  tokio ").unwrap();
        assert!(list.is_loading());
        assert!(list.next_response().await);
        assert_eq!(list.len(), 2);

        assert!(list.load_more());
        assert!(list.next_response().await);
        assert_eq!(list.state(), LoadState::Exhausted);

        let ids: Vec<i64> = list.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(session.network_state(), NetworkState::success());
        assert_eq!(session.query().unwrap().text(), "tokio");

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("tokio".to_string(), 1, 30));
        assert_eq!(calls[1].1, 2);
    }

    #[tokio::test]
    async fn test_empty_initial_page_reports_not_found() {
        let client = Arc::new(StubSearch::default());
        let mut session = session(client);

        let list = session.set_query("zzzz").unwrap();
        assert!(list.next_response().await);
        assert!(list.is_empty());
        assert_eq!(list.state(), LoadState::Exhausted);

        let state = session.network_state();
        assert_eq!(state.status, NetworkStatus::NotFound);
        assert_eq!(state.message.as_deref(), Some("Nothing found for \"zzzz\""));
    }

    #[tokio::test]
    async fn test_blank_query_reports_error_without_fetching() {
        let client = Arc::new(StubSearch::two_pages());
        let mut session = session(Arc::clone(&client));

        let list = session.set_query("   ").unwrap();
        // Answered synchronously.
        assert!(list.poll());
        assert!(list.is_empty());
        assert_eq!(list.state(), LoadState::Exhausted);

        assert_eq!(session.network_state(), NetworkState::error(NO_QUERY_MESSAGE));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_ends_list_and_reports_connection_error() {
        let client = Arc::new(StubSearch::failing(|| {
            GitHubError::Internal("Unexpected HTTP status: 502".to_string())
        }));
        let mut session = session(client);

        let list = session.set_query("tokio").unwrap();
        assert!(list.next_response().await);
        assert!(list.is_empty());
        assert_eq!(list.state(), LoadState::Exhausted);

        assert_eq!(
            session.network_state(),
            NetworkState::error(CONNECTION_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let client = Arc::new(StubSearch::failing(|| GitHubError::RateLimited {
            reset_at: chrono::Utc::now(),
        }));
        let mut session = SearchSession::new(Arc::clone(&client), signed_in(), Handle::current())
            .with_retry_config(
                RetryConfig::new(Duration::from_millis(1), Duration::from_millis(2), 2)
                    .with_jitter(false),
            );

        let list = session.set_query("tokio").unwrap();
        assert!(list.next_response().await);
        assert_eq!(client.calls().len(), 3);
        assert_eq!(session.network_state().status, NetworkStatus::Error);
    }

    #[tokio::test]
    async fn test_new_query_replaces_list() {
        let client = Arc::new(StubSearch::two_pages());
        let mut session = session(Arc::clone(&client));

        session.set_query("first").unwrap().next_response().await;
        let list = session.set_query("second").unwrap();
        assert!(list.is_empty());
        assert_eq!(list.pages_loaded(), 0);
        assert!(list.next_response().await);
        assert_eq!(list.len(), 2);

        let queries: Vec<String> = client.calls().into_iter().map(|c| c.0).collect();
        assert_eq!(queries, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_known_visited_ids_mark_results() {
        let client = Arc::new(StubSearch::two_pages());
        let mut session = session(client).with_visited_ids([2]);

        let list = session.set_query("tokio").unwrap();
        list.next_response().await;

        let visited: Vec<bool> = list.items().iter().map(|i| i.visited).collect();
        assert_eq!(visited, vec![false, true]);
    }

    #[tokio::test]
    async fn test_visit_without_results() {
        let client = Arc::new(StubSearch::two_pages());
        let mut session = session(client);
        let db = DatabaseConnection::Disconnected;

        assert!(matches!(
            session.visit(0, &db).await,
            Err(SearchError::NoActiveSearch)
        ));

        session.set_query("tokio").unwrap().next_response().await;
        assert!(matches!(
            session.visit(7, &db).await,
            Err(SearchError::NoSuchItem(7))
        ));
        assert!(session.visited_ids().is_empty());
    }

    /// Fails slowly for "old", answers an empty page at once for anything else.
    struct SlowOldQuery;

    #[async_trait]
    impl RepositorySearch for SlowOldQuery {
        async fn search(
            &self,
            query: &SearchQuery,
            _page: PageToken,
            _per_page: u32,
        ) -> std::result::Result<SearchResults, GitHubError> {
            if query.text() == "old" {
                tokio::time::sleep(Duration::from_millis(50)).await;
                return Err(GitHubError::Internal("Unexpected HTTP status: 502".to_string()));
            }
            Ok(SearchResults::default())
        }
    }

    #[tokio::test]
    async fn test_replaced_query_does_not_overwrite_status() {
        let mut session = SearchSession::new(Arc::new(SlowOldQuery), signed_in(), Handle::current())
            .with_retry_config(RetryConfig::disabled());

        session.set_query("old").unwrap();
        session.set_query("new").unwrap().next_response().await;
        let expected = NetworkState::not_found("new");
        assert_eq!(session.network_state(), expected);

        // Let the first query's fetch finish.
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(session.network_state(), expected);
    }
}
