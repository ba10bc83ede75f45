//! Adapter from the consumer's data source contract to a page listener.

use super::listener::PageRequestListener;
use super::page::{LoadInitialParams, LoadParams};
use super::responder::PageResponder;
use super::source::PageKeyedDataSource;

/// Implements [`PageKeyedDataSource`] by forwarding to a [`PageRequestListener`].
///
/// The bridge owns nothing but the listener it was built with. Requests and
/// responders are passed through untouched; the bridge never blocks, never
/// validates, and never answers a responder itself.
///
/// Backward loads are not supported. `load_before` returns immediately and
/// drops the responder unanswered.
#[derive(Debug, Clone)]
pub struct PagingBridge<L> {
    listener: L,
}

impl<L> PagingBridge<L> {
    /// Bind a bridge to a listener for the lifetime of one session.
    pub fn new(listener: L) -> Self {
        Self { listener }
    }

    /// The listener this bridge forwards to.
    #[inline]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Unwrap the listener.
    pub fn into_listener(self) -> L {
        self.listener
    }
}

impl<Item, L> PageKeyedDataSource<Item> for PagingBridge<L>
where
    L: PageRequestListener<Item>,
{
    #[inline]
    fn load_initial(&self, params: LoadInitialParams, responder: PageResponder<Item>) {
        self.listener.load_initial(params, responder);
    }

    #[inline]
    fn load_after(&self, params: LoadParams, responder: PageResponder<Item>) {
        self.listener.load_after(params, responder);
    }

    fn load_before(&self, params: LoadParams, _responder: PageResponder<Item>) {
        tracing::trace!(key = params.key, "Backward load ignored");
    }
}
