//! One user's search screen: the query, its result list, and status.

use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::error::{Result, SearchError};
use super::item::SearchItem;
use super::query::{SearchQuery, SearchSort};
use super::repository::{RepositorySearch, SearchRepository, VisitedIds};
use super::status::NetworkState;
use crate::auth::AuthSession;
use crate::paging::{PagedList, PagedListConfig, PagingBridge};
use crate::retry::RetryConfig;
use crate::visited;

/// The paged result list for one query.
pub type SearchList<C> = PagedList<SearchItem, PagingBridge<SearchRepository<C>>>;

/// Owns the current query and its [`SearchList`].
///
/// Setting a new query discards the previous list (and its bridge and
/// listener) and starts a fresh one, so a response that arrives for the old
/// query can never land in the new list.
pub struct SearchSession<C> {
    client: Arc<C>,
    auth: AuthSession,
    handle: Handle,
    status: Arc<watch::Sender<NetworkState>>,
    visited: VisitedIds,
    list_config: PagedListConfig,
    retry: RetryConfig,
    sort: Option<SearchSort>,
    query: Option<SearchQuery>,
    list: Option<SearchList<C>>,
}

impl<C> SearchSession<C>
where
    C: RepositorySearch + 'static,
{
    /// Create a session. Fetches run as tasks on `handle`.
    pub fn new(client: Arc<C>, auth: AuthSession, handle: Handle) -> Self {
        let (status, _) = watch::channel(NetworkState::idle());
        Self {
            client,
            auth,
            handle,
            status: Arc::new(status),
            visited: VisitedIds::default(),
            list_config: PagedListConfig::default(),
            retry: RetryConfig::default(),
            sort: None,
            query: None,
            list: None,
        }
    }

    #[must_use]
    pub fn with_list_config(mut self, config: PagedListConfig) -> Self {
        self.list_config = config;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Option<SearchSort>) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Seed the IDs of repositories already visited, so new results show
    /// them as such.
    #[must_use]
    pub fn with_visited_ids(self, ids: impl IntoIterator<Item = i64>) -> Self {
        if let Ok(mut visited) = self.visited.write() {
            visited.extend(ids);
        }
        self
    }

    /// Start searching for `text`.
    ///
    /// Requires a signed-in user. The previous list, if any, is dropped and
    /// the initial page of the new one is requested immediately.
    pub fn set_query(&mut self, text: &str) -> Result<&mut SearchList<C>> {
        self.auth.require_authenticated()?;

        let query = SearchQuery::new(text).with_sort(self.sort);
        tracing::info!(query = %query.text(), sort = ?query.sort(), "Starting search");

        let repository = SearchRepository::new(
            Arc::clone(&self.client),
            query.clone(),
            Arc::clone(&self.status),
            self.handle.clone(),
        )
        .with_visited(Arc::clone(&self.visited))
        .with_retry_config(self.retry.clone());

        let mut list = PagedList::new(PagingBridge::new(repository), self.list_config);
        list.start();

        self.query = Some(query);
        Ok(self.list.insert(list))
    }

    /// Record a visit to the item at `index`, then mark it visited.
    ///
    /// The list and the visited-id set change only once the visit is saved.
    /// Returns the updated item.
    pub async fn visit(&mut self, index: usize, db: &DatabaseConnection) -> Result<SearchItem> {
        let list = self.list.as_ref().ok_or(SearchError::NoActiveSearch)?;
        let mut item = list
            .get(index)
            .cloned()
            .ok_or(SearchError::NoSuchItem(index))?;
        item.mark_visited();

        visited::save(db, &item).await?;

        if let Some(list) = self.list.as_mut() {
            list.update_item(index, SearchItem::mark_visited);
        }
        if let Ok(mut visited) = self.visited.write() {
            visited.insert(item.id);
        }

        tracing::debug!(repo = %item.full_name, "Recorded visit");
        Ok(item)
    }

    pub fn list(&self) -> Option<&SearchList<C>> {
        self.list.as_ref()
    }

    pub fn list_mut(&mut self) -> Option<&mut SearchList<C>> {
        self.list.as_mut()
    }

    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /// Latest network status.
    pub fn network_state(&self) -> NetworkState {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<NetworkState> {
        self.status.subscribe()
    }

    /// IDs currently known to be visited.
    pub fn visited_ids(&self) -> HashSet<i64> {
        self.visited
            .read()
            .map(|visited| visited.clone())
            .unwrap_or_default()
    }
}
