//! The search-backed page listener.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::item::SearchItem;
use super::query::SearchQuery;
use super::status::{CONNECTION_ERROR_MESSAGE, NO_QUERY_MESSAGE, NetworkState};
use crate::github::{GitHubError, MAX_PER_PAGE, short_error_message};
use crate::paging::{LoadInitialParams, LoadParams, PageRequestListener, PageResponder, PageToken};
use crate::retry::{RetryConfig, with_retry};

/// GitHub page numbers start at 1.
pub const FIRST_PAGE: PageToken = 1;

/// One page of results from a [`RepositorySearch`] backend.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub items: Vec<SearchItem>,
    pub total_count: u64,
    /// Page to request next, or `None` if this was the last page.
    pub next_page: Option<PageToken>,
}

/// A backend that can search repositories one page at a time.
#[async_trait]
pub trait RepositorySearch: Send + Sync {
    async fn search(
        &self,
        query: &SearchQuery,
        page: PageToken,
        per_page: u32,
    ) -> Result<SearchResults, GitHubError>;
}

/// IDs of repositories the user has already opened.
pub type VisitedIds = Arc<RwLock<HashSet<i64>>>;

/// Fetches search result pages for one query.
///
/// Each request is served on a task spawned on `handle`, so the listener
/// returns immediately. Failures are retried with backoff; if they persist
/// the responder gets an empty last page and the error is published on
/// the network status channel instead.
pub struct SearchRepository<C> {
    client: Arc<C>,
    query: SearchQuery,
    status: Arc<watch::Sender<NetworkState>>,
    visited: VisitedIds,
    handle: Handle,
    retry: RetryConfig,
}

impl<C> SearchRepository<C>
where
    C: RepositorySearch + 'static,
{
    pub fn new(
        client: Arc<C>,
        query: SearchQuery,
        status: Arc<watch::Sender<NetworkState>>,
        handle: Handle,
    ) -> Self {
        Self {
            client,
            query,
            status,
            visited: VisitedIds::default(),
            handle,
            retry: RetryConfig::default(),
        }
    }

    /// Mark results whose ID is in `visited`.
    #[must_use]
    pub fn with_visited(mut self, visited: VisitedIds) -> Self {
        self.visited = visited;
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    fn fetch(
        &self,
        page: PageToken,
        requested: u32,
        initial: bool,
        responder: PageResponder<SearchItem>,
    ) {
        if self.query.is_blank() {
            self.status.send_replace(NetworkState::error(NO_QUERY_MESSAGE));
            responder.respond(Vec::new(), None);
            return;
        }

        self.status.send_replace(NetworkState::loading());

        let per_page = requested.clamp(1, MAX_PER_PAGE);
        let client = Arc::clone(&self.client);
        let query = self.query.clone();
        let status = Arc::clone(&self.status);
        let visited = Arc::clone(&self.visited);
        let retry = self.retry.clone();

        self.handle.spawn(async move {
            tracing::debug!(query = %query.text(), page, per_page, "Fetching search page");

            let result = with_retry(
                || client.search(&query, page, per_page),
                GitHubError::is_retryable,
                |e: &GitHubError| short_error_message(e),
                query.text(),
                &retry,
            )
            .await;

            // The list was replaced or dropped; its status is no longer ours.
            if responder.is_closed() {
                tracing::debug!(query = %query.text(), page, "Search superseded, dropping result");
                return;
            }

            match result {
                Ok(results) => {
                    let mut items = results.items;
                    mark_known_visited(&mut items, &visited);

                    if initial && items.is_empty() {
                        status.send_replace(NetworkState::not_found(query.text()));
                    } else {
                        status.send_replace(NetworkState::success());
                    }

                    tracing::debug!(
                        query = %query.text(),
                        page,
                        received = items.len(),
                        total = results.total_count,
                        next_page = ?results.next_page,
                        "Search page received"
                    );
                    responder.respond(items, results.next_page);
                }
                Err(e) => {
                    tracing::warn!(
                        query = %query.text(),
                        page,
                        error = %e,
                        "Search failed, ending result list"
                    );
                    let message = match &e {
                        GitHubError::InvalidQuery(_) => e.to_string(),
                        _ => CONNECTION_ERROR_MESSAGE.to_string(),
                    };
                    status.send_replace(NetworkState::error(message));
                    responder.respond(Vec::new(), None);
                }
            }
        });
    }
}

fn mark_known_visited(items: &mut [SearchItem], visited: &VisitedIds) {
    let Ok(visited) = visited.read() else {
        return;
    };
    if visited.is_empty() {
        return;
    }
    for item in items.iter_mut().filter(|item| visited.contains(&item.id)) {
        item.mark_visited();
    }
}

impl<C> PageRequestListener<SearchItem> for SearchRepository<C>
where
    C: RepositorySearch + 'static,
{
    fn load_initial(&self, params: LoadInitialParams, responder: PageResponder<SearchItem>) {
        self.fetch(FIRST_PAGE, params.requested_load_size, true, responder);
    }

    fn load_after(&self, params: LoadParams, responder: PageResponder<SearchItem>) {
        self.fetch(params.key, params.requested_load_size, false, responder);
    }
}
