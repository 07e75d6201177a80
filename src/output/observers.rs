//! Stock [`CrawlObserver`] implementations

use crate::crawler::{FetchError, FetchedPage};
use crate::output::traits::{CrawlObserver, SkipReason};
use crate::Address;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Reports events through `tracing`
///
/// Successful fetches log at info, failures at warn, skips at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<A: Address> CrawlObserver<A> for TracingObserver {
    fn on_fetched(&self, address: &A, depth: i32, page: &FetchedPage<A>) {
        tracing::info!(
            %address,
            depth,
            links = page.links.len(),
            body_len = page.body.len(),
            "fetched"
        );
        tracing::debug!(%address, links = ?page.links, "discovered links");
    }

    fn on_fetch_failed(&self, address: &A, depth: i32, error: &FetchError) {
        tracing::warn!(%address, depth, %error, "fetch failed");
    }

    fn on_skipped(&self, address: &A, reason: SkipReason) {
        tracing::debug!(%address, %reason, "skipped");
    }
}

/// One observed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent<A> {
    Fetched {
        address: A,
        depth: i32,
        body: String,
        links: Vec<A>,
    },
    Failed {
        address: A,
        depth: i32,
        error: FetchError,
    },
    Skipped {
        address: A,
        reason: SkipReason,
    },
}

/// Keeps every event in memory, in the order they were reported
#[derive(Debug)]
pub struct RecordingObserver<A> {
    events: Mutex<Vec<CrawlEvent<A>>>,
}

impl<A: Address> RecordingObserver<A> {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<CrawlEvent<A>> {
        self.lock().clone()
    }

    /// Addresses fetched successfully, in report order
    pub fn fetched(&self) -> Vec<A> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                CrawlEvent::Fetched { address, .. } => Some(address.clone()),
                _ => None,
            })
            .collect()
    }

    /// Failed fetches, in report order
    pub fn failures(&self) -> Vec<(A, FetchError)> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                CrawlEvent::Failed { address, error, .. } => {
                    Some((address.clone(), error.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Number of skips with the given reason
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.lock()
            .iter()
            .filter(|event| {
                matches!(event, CrawlEvent::Skipped { reason: r, .. } if *r == reason)
            })
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CrawlEvent<A>>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Address> Default for RecordingObserver<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Address> CrawlObserver<A> for RecordingObserver<A> {
    fn on_fetched(&self, address: &A, depth: i32, page: &FetchedPage<A>) {
        self.lock().push(CrawlEvent::Fetched {
            address: address.clone(),
            depth,
            body: page.body.clone(),
            links: page.links.clone(),
        });
    }

    fn on_fetch_failed(&self, address: &A, depth: i32, error: &FetchError) {
        self.lock().push(CrawlEvent::Failed {
            address: address.clone(),
            depth,
            error: error.clone(),
        });
    }

    fn on_skipped(&self, address: &A, reason: SkipReason) {
        self.lock().push(CrawlEvent::Skipped {
            address: address.clone(),
            reason,
        });
    }
}
