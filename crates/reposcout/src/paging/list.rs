//! A forward-only paged list that drives a [`PageKeyedDataSource`].

use super::page::{LoadInitialParams, LoadParams, Page, PageToken};
use super::responder::{PendingPage, PollPage, page_channel};
use super::source::PageKeyedDataSource;

/// Default page size hint sent with every request.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Default distance from the end of the loaded items at which the next page
/// is requested.
pub const DEFAULT_PREFETCH_DISTANCE: usize = 10;

/// Where the list is in its loading lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The initial page has not been requested (or its request was abandoned).
    NotStarted,
    /// A request is in flight.
    Loading,
    /// Pages are loaded and a next key is known.
    Idle,
    /// The last page has been received; no further loads will be issued.
    Exhausted,
}

/// Tuning for a [`PagedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagedListConfig {
    /// Page size hint passed to the data source.
    pub page_size: u32,
    /// How close to the end a read must come before the next page is loaded.
    pub prefetch_distance: usize,
}

impl Default for PagedListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
        }
    }
}

/// Accumulates pages from a data source, keeping at most one request in flight.
pub struct PagedList<Item, S> {
    source: S,
    config: PagedListConfig,
    items: Vec<Item>,
    next_key: Option<PageToken>,
    state: LoadState,
    pending: Option<PendingPage<Item>>,
    pages_loaded: usize,
}

impl<Item, S> PagedList<Item, S>
where
    S: PageKeyedDataSource<Item>,
{
    /// Create an empty list. Nothing is requested until [`PagedList::start`].
    pub fn new(source: S, config: PagedListConfig) -> Self {
        Self {
            source,
            config,
            items: Vec::new(),
            next_key: None,
            state: LoadState::NotStarted,
            pending: None,
            pages_loaded: 0,
        }
    }

    /// Request the initial page. Returns false if it was already requested.
    pub fn start(&mut self) -> bool {
        if self.state != LoadState::NotStarted {
            return false;
        }

        let (responder, pending) = page_channel();
        tracing::trace!(responder = %responder.id(), "Requesting initial page");

        self.pending = Some(pending);
        self.state = LoadState::Loading;
        self.source.load_initial(
            LoadInitialParams {
                requested_load_size: self.config.page_size,
            },
            responder,
        );
        true
    }

    /// Tell the list that the reader is looking at `index`.
    ///
    /// Requests the next page when `index` is within the prefetch distance of
    /// the end, a next key is known, and nothing is already in flight.
    /// Returns true if a request was issued.
    pub fn load_around(&mut self, index: usize) -> bool {
        if self.state != LoadState::Idle {
            return false;
        }
        let Some(key) = self.next_key else {
            return false;
        };
        if index.saturating_add(self.config.prefetch_distance) < self.items.len() {
            return false;
        }

        let (responder, pending) = page_channel();
        tracing::trace!(responder = %responder.id(), key, "Requesting page");

        self.pending = Some(pending);
        self.state = LoadState::Loading;
        self.source.load_after(
            LoadParams {
                key,
                requested_load_size: self.config.page_size,
            },
            responder,
        );
        true
    }

    /// Request the next page as if the reader had reached the last item.
    pub fn load_more(&mut self) -> bool {
        self.load_around(self.items.len().saturating_sub(1))
    }

    /// Apply a response if one is ready. Never waits.
    ///
    /// Returns true if a page was appended.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        match pending.try_take() {
            PollPage::Ready(page) => {
                self.pending = None;
                self.apply(page);
                true
            }
            PollPage::Pending => false,
            PollPage::Abandoned => {
                self.pending = None;
                self.abandon();
                false
            }
        }
    }

    /// Wait for the in-flight response, if any.
    ///
    /// Returns true if a page was appended. If the data source never answers,
    /// this never completes; callers that need a bound should wrap it in a
    /// timeout.
    pub async fn next_response(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let page = pending.recv().await;
        self.pending = None;

        match page {
            Some(page) => {
                self.apply(page);
                true
            }
            None => {
                self.abandon();
                false
            }
        }
    }

    fn apply(&mut self, page: Page<Item>) {
        self.pages_loaded += 1;
        self.items.extend(page.items);
        self.next_key = page.next_key;
        self.state = if self.next_key.is_some() {
            LoadState::Idle
        } else {
            LoadState::Exhausted
        };
        tracing::trace!(
            pages = self.pages_loaded,
            items = self.items.len(),
            next_key = ?self.next_key,
            "Page applied"
        );
    }

    fn abandon(&mut self) {
        tracing::debug!(next_key = ?self.next_key, "Page load abandoned");
        self.state = if self.pages_loaded == 0 {
            LoadState::NotStarted
        } else {
            LoadState::Idle
        };
    }
}

impl<Item, S> PagedList<Item, S> {
    /// Items loaded so far, in page order.
    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Key of the next page, if one is known.
    #[inline]
    pub fn next_key(&self) -> Option<PageToken> {
        self.next_key
    }

    /// Number of pages received.
    #[inline]
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    #[inline]
    pub fn config(&self) -> PagedListConfig {
        self.config
    }

    /// The data source this list reads from.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Change display state of a loaded item in place.
    ///
    /// Returns false if `index` is out of range.
    pub fn update_item(&mut self, index: usize, f: impl FnOnce(&mut Item)) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }

    /// Consume the list, returning the loaded items.
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}
