//! Page keys, load requests, and load results.

/// Integer cursor identifying where the next page of results begins.
///
/// Keys only ever move forward: each page names the key of the page after it.
pub type PageToken = i32;

/// Parameters for the first load of a session.
///
/// There is no key; the only input is how many items the consumer would
/// like to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadInitialParams {
    /// Page size hint supplied by the consumer.
    pub requested_load_size: u32,
}

/// Parameters for loading the page identified by `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    /// Key of the page to load, as returned by the previous page.
    pub key: PageToken,
    /// Page size hint supplied by the consumer.
    pub requested_load_size: u32,
}

/// A batch of items plus the key of the page that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<Item> {
    /// Items in the order they should be appended.
    pub items: Vec<Item>,
    /// Key for the next page, or `None` when the data is exhausted.
    pub next_key: Option<PageToken>,
}

impl<Item> Page<Item> {
    /// Create a page with an optional continuation key.
    #[inline]
    pub fn new(items: Vec<Item>, next_key: Option<PageToken>) -> Self {
        Self { items, next_key }
    }

    /// Create the final page of a result set.
    #[inline]
    pub fn last(items: Vec<Item>) -> Self {
        Self::new(items, None)
    }

    /// An empty, final page. This is also how a failed load is reported.
    #[inline]
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Returns true if no further page follows this one.
    #[inline]
    pub fn is_last(&self) -> bool {
        self.next_key.is_none()
    }
}
