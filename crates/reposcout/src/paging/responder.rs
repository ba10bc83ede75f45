//! One-shot response sinks for page loads.
//!
//! A [`PageResponder`] is handed to whoever fetches a page. Calling
//! [`PageResponder::respond`] consumes it, so a load can be answered at most
//! once. The consumer keeps the matching [`PendingPage`] and picks the result
//! up whenever it arrives, synchronously or after a network round trip.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use super::page::{Page, PageToken};

static NEXT_RESPONDER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a responder/pending pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponderId(u64);

impl ResponderId {
    fn next() -> Self {
        Self(NEXT_RESPONDER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResponderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Create a linked responder and pending page.
pub fn page_channel<Item>() -> (PageResponder<Item>, PendingPage<Item>) {
    let id = ResponderId::next();
    let (tx, rx) = oneshot::channel();
    (PageResponder { id, tx }, PendingPage { id, rx })
}

/// Completion handler for a single page load.
pub struct PageResponder<Item> {
    id: ResponderId,
    tx: oneshot::Sender<Page<Item>>,
}

impl<Item> PageResponder<Item> {
    /// Identity shared with the consumer's [`PendingPage`].
    #[inline]
    pub fn id(&self) -> ResponderId {
        self.id
    }

    /// Deliver the page. Returns false if the consumer has already gone away,
    /// in which case the items are dropped.
    pub fn respond(self, items: Vec<Item>, next_key: Option<PageToken>) -> bool {
        self.respond_with(Page::new(items, next_key))
    }

    /// Deliver an already assembled page.
    pub fn respond_with(self, page: Page<Item>) -> bool {
        let id = self.id;
        match self.tx.send(page) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!(responder = %id, "Page consumer is gone, dropping response");
                false
            }
        }
    }

    /// Returns true if nobody is waiting for this response any more.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<Item> fmt::Debug for PageResponder<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageResponder")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Outcome of a non-blocking check on a [`PendingPage`].
#[derive(Debug)]
pub enum PollPage<Item> {
    /// The responder delivered a page.
    Ready(Page<Item>),
    /// No answer yet.
    Pending,
    /// The responder was dropped without answering.
    Abandoned,
}

/// Consumer half of a page load.
pub struct PendingPage<Item> {
    id: ResponderId,
    rx: oneshot::Receiver<Page<Item>>,
}

impl<Item> PendingPage<Item> {
    /// Identity shared with the producer's [`PageResponder`].
    #[inline]
    pub fn id(&self) -> ResponderId {
        self.id
    }

    /// Check for a response without waiting.
    pub fn try_take(&mut self) -> PollPage<Item> {
        match self.rx.try_recv() {
            Ok(page) => PollPage::Ready(page),
            Err(TryRecvError::Empty) => PollPage::Pending,
            Err(TryRecvError::Closed) => PollPage::Abandoned,
        }
    }

    /// Wait for the response. Returns `None` if the load was abandoned.
    ///
    /// Must not be called again once it has returned.
    pub async fn recv(&mut self) -> Option<Page<Item>> {
        (&mut self.rx).await.ok()
    }
}

impl<Item> fmt::Debug for PendingPage<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingPage")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
