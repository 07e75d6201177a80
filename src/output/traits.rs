//! Observer trait for per-task crawl events
//!
//! The crawl core calls out to a [`CrawlObserver`] as tasks finish their work.
//! How events are rendered (logs, stdout, a test log) is up to the implementation.

use crate::crawler::{FetchError, FetchedPage};
use crate::Address;
use std::fmt;

/// Why a task ended without fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The task's depth budget was zero or less
    DepthExhausted,

    /// Another task (or an earlier one) already claimed the address
    AlreadyClaimed,

    /// The crawl was cancelled before the task started its work
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::DepthExhausted => "depth exhausted",
            Self::AlreadyClaimed => "already claimed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Receives per-task events from a running crawl
///
/// Methods are called concurrently from many tasks and must not block for long.
pub trait CrawlObserver<A: Address>: Send + Sync {
    /// `address` was claimed and fetched successfully at `depth`
    fn on_fetched(&self, address: &A, depth: i32, page: &FetchedPage<A>);

    /// The fetch of claimed `address` failed; no children will be spawned
    fn on_fetch_failed(&self, address: &A, depth: i32, error: &FetchError);

    /// A task ended without fetching
    fn on_skipped(&self, _address: &A, _reason: SkipReason) {}
}

/// Discards every event
impl<A: Address> CrawlObserver<A> for () {
    fn on_fetched(&self, _address: &A, _depth: i32, _page: &FetchedPage<A>) {}

    fn on_fetch_failed(&self, _address: &A, _depth: i32, _error: &FetchError) {}
}
