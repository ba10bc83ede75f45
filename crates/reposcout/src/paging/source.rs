use super::page::{LoadInitialParams, LoadParams};
use super::responder::PageResponder;

/// Page-keyed data source contract, as seen by a list consumer.
///
/// The consumer asks for an initial page and then for pages after (or
/// before) a key, handing over a responder each time. A request whose
/// responder is never answered simply stays in flight.
pub trait PageKeyedDataSource<Item> {
    /// Request the first page.
    fn load_initial(&self, params: LoadInitialParams, responder: PageResponder<Item>);

    /// Request the page that follows `params.key`.
    fn load_after(&self, params: LoadParams, responder: PageResponder<Item>);

    /// Request the page that precedes `params.key`.
    fn load_before(&self, params: LoadParams, responder: PageResponder<Item>);
}
