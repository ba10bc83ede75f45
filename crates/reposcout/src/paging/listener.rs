use std::sync::Arc;

use super::page::{LoadInitialParams, LoadParams};
use super::responder::PageResponder;

/// Supplies pages on demand.
///
/// Implementations decide how a page is fetched; the paging machinery only
/// decides when. Each call hands over a [`PageResponder`] that must be
/// answered exactly once, either before returning or later from another
/// task.
///
/// There is no error channel. An implementation that cannot produce a page
/// retries internally or answers with an empty batch and no next key, which
/// the consumer treats as the end of the data.
///
/// Paging is forward-only, so there is no way to ask for the page before a
/// key.
pub trait PageRequestListener<Item> {
    /// Load the first page of the session.
    fn load_initial(&self, params: LoadInitialParams, responder: PageResponder<Item>);

    /// Load the page identified by `params.key`.
    fn load_after(&self, params: LoadParams, responder: PageResponder<Item>);
}

impl<Item, L> PageRequestListener<Item> for Arc<L>
where
    L: PageRequestListener<Item> + ?Sized,
{
    #[inline]
    fn load_initial(&self, params: LoadInitialParams, responder: PageResponder<Item>) {
        (**self).load_initial(params, responder);
    }

    #[inline]
    fn load_after(&self, params: LoadParams, responder: PageResponder<Item>) {
        (**self).load_after(params, responder);
    }
}
