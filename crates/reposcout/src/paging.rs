//! Forward-only, page-keyed loading.
//!
//! This module separates *how* a page is fetched from *when* a list consumer
//! asks for one:
//!
//! - [`PageRequestListener`] is implemented by whatever knows how to fetch a
//!   page (see [`crate::search::SearchRepository`]).
//! - [`PageKeyedDataSource`] is the contract a list consumer drives.
//! - [`PagingBridge`] implements the data source by forwarding every request
//!   to a listener, untouched.
//! - [`PagedList`] is a minimal consumer: it issues the initial load, then
//!   loads the page after the last key as the reader nears the end.
//!
//! Results travel through one-shot [`PageResponder`]s, so every request is
//! answered at most once, whenever the fetch completes.
//!
//! # Example
//!
//! ```ignore
//! use reposcout::paging::{PagedList, PagedListConfig, PagingBridge};
//!
//! let mut list = PagedList::new(PagingBridge::new(listener), PagedListConfig::default());
//! list.start();
//! list.next_response().await;
//! list.load_more();
//! ```

mod bridge;
mod list;
mod listener;
mod page;
mod responder;
mod source;

pub use bridge::PagingBridge;
pub use list::{
    DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_DISTANCE, LoadState, PagedList, PagedListConfig,
};
pub use listener::PageRequestListener;
pub use page::{LoadInitialParams, LoadParams, Page, PageToken};
pub use responder::{PageResponder, PendingPage, PollPage, ResponderId, page_channel};
pub use source::PageKeyedDataSource;
