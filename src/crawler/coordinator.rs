//! Crawler coordinator - recursive fan-out over a shared visited set
//!
//! Every (address, depth) pair runs as its own tokio task:
//! - Tasks with no depth left end immediately
//! - The address is claimed atomically; losers end without fetching
//! - The winner fetches, then spawns one child per discovered link at depth - 1
//!
//! Each task is registered with the crawl's [`TaskGroup`] by its parent before
//! it is spawned, and deregisters by dropping its guard once its own fetch and
//! spawning are done. The crawl is complete when the group drains.

use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::crawler::tracker::{TaskGroup, TaskGuard};
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlObserver, CrawlSummary, SkipReason};
use crate::state::TaskState;
use crate::Address;
use chrono::Utc;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Tunables for a crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Cap on fetches in flight at once; unbounded when `None`
    pub max_concurrent_fetches: Option<usize>,

    /// Fetches taking longer than this fail with [`FetchError::Timeout`]
    pub fetch_timeout: Option<Duration>,
}

/// Depth-bounded concurrent crawler
///
/// Cheap to share: each call to [`Crawler::crawl`] gets its own visited set
/// and completion tracker, so concurrent crawls do not interfere.
pub struct Crawler<A: Address> {
    fetcher: Arc<dyn Fetcher<A>>,
    observer: Arc<dyn CrawlObserver<A>>,
    options: CrawlOptions,
}

impl<A: Address> Crawler<A> {
    pub fn new(fetcher: Arc<dyn Fetcher<A>>, observer: Arc<dyn CrawlObserver<A>>) -> Self {
        Self {
            fetcher,
            observer,
            options: CrawlOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CrawlOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Crawls from `start` with a budget of `depth` and returns once every
    /// spawned task has finished
    pub async fn crawl(&self, start: A, depth: i32) -> CrawlSummary {
        self.crawl_with_cancellation(start, depth, CancellationToken::new())
            .await
    }

    /// Like [`Crawler::crawl`], but tasks that start after `cancel` fires end
    /// without claiming or fetching
    ///
    /// Fetches already in flight are allowed to finish; their links are still
    /// spawned and immediately wind down.
    pub async fn crawl_with_cancellation(
        &self,
        start: A,
        depth: i32,
        cancel: CancellationToken,
    ) -> CrawlSummary {
        self.crawl_in_group(start, depth, cancel, TaskGroup::new())
            .await
    }

    /// Runs a crawl whose tasks register with `tasks`, which must be idle
    pub(crate) async fn crawl_in_group(
        &self,
        start: A,
        depth: i32,
        cancel: CancellationToken,
        tasks: TaskGroup,
    ) -> CrawlSummary {
        let started_at = Utc::now();
        let ctx = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            observer: Arc::clone(&self.observer),
            visited: VisitedSet::new(),
            tasks,
            limiter: self
                .options
                .max_concurrent_fetches
                .map(|permits| Semaphore::new(permits.clamp(1, Semaphore::MAX_PERMITS))),
            fetch_timeout: self.options.fetch_timeout,
            cancel,
            counters: Counters::default(),
        });

        tracing::info!("Starting crawl of {} with depth {}", start, depth);
        spawn_task(&ctx, start.clone(), depth);
        ctx.tasks.wait().await;

        let summary = ctx.summary(start.to_string(), depth, started_at);
        tracing::info!(
            "Crawl of {} complete: {} fetched, {} failed, {} tasks in {:?}",
            summary.start,
            summary.fetched,
            summary.failed,
            summary.tasks_spawned,
            summary.duration()
        );
        summary
    }
}

/// State shared by every task of one crawl invocation
struct CrawlContext<A: Address> {
    fetcher: Arc<dyn Fetcher<A>>,
    observer: Arc<dyn CrawlObserver<A>>,
    visited: VisitedSet<A>,
    tasks: TaskGroup,
    limiter: Option<Semaphore>,
    fetch_timeout: Option<Duration>,
    cancel: CancellationToken,
    counters: Counters,
}

#[derive(Debug, Default)]
struct Counters {
    fetched: AtomicUsize,
    failed: AtomicUsize,
    skipped_duplicate: AtomicUsize,
    skipped_depth: AtomicUsize,
    cancelled: AtomicUsize,
}

impl<A: Address> CrawlContext<A> {
    fn summary(
        &self,
        start: String,
        depth: i32,
        started_at: chrono::DateTime<Utc>,
    ) -> CrawlSummary {
        CrawlSummary {
            start,
            depth,
            fetched: self.counters.fetched.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            skipped_duplicate: self.counters.skipped_duplicate.load(Ordering::Relaxed),
            skipped_depth: self.counters.skipped_depth.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
            tasks_spawned: self.tasks.spawned(),
            addresses_claimed: self.visited.len(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn skip(&self, address: &A, reason: SkipReason) {
        let counter = match reason {
            SkipReason::DepthExhausted => &self.counters.skipped_depth,
            SkipReason::AlreadyClaimed => &self.counters.skipped_duplicate,
            SkipReason::Cancelled => &self.counters.cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.observer.on_skipped(address, reason);
    }

    /// Runs the fetch under the concurrency cap and timeout, if configured
    async fn fetch(&self, address: &A) -> Result<FetchedPage<A>, FetchError> {
        // Held only for the fetch itself, never across spawning
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        let fetch = self.fetcher.fetch(address);
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.unwrap_or_else(|_| {
                Err(FetchError::Timeout {
                    address: address.to_string(),
                })
            }),
            None => fetch.await,
        }
    }
}

type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Registers a task for `address` and hands it to the runtime
///
/// Registration happens here, in the caller, so the group can never be
/// observed empty while this child is on its way.
fn spawn_task<A: Address>(ctx: &Arc<CrawlContext<A>>, address: A, depth: i32) {
    let guard = ctx.tasks.register();
    let task: TaskFuture = Box::pin(run_task(Arc::clone(ctx), address, depth, guard));
    tokio::spawn(task);
}

/// Body of one crawl task; `_guard` drops on every return path
async fn run_task<A: Address>(
    ctx: Arc<CrawlContext<A>>,
    address: A,
    depth: i32,
    _guard: TaskGuard,
) {
    let mut state = TaskState::Pending;
    let mut advance = |next: TaskState| {
        debug_assert!(!state.is_terminal(), "{} task advanced to {}", state, next);
        debug_assert!(state.can_transition_to(next), "{} -> {}", state, next);
        tracing::trace!(%address, depth, from = %state, to = %next, "task transition");
        state = next;
    };

    if ctx.cancel.is_cancelled() {
        advance(TaskState::Finished);
        ctx.skip(&address, SkipReason::Cancelled);
        return;
    }

    advance(TaskState::CheckingDepth);
    if depth <= 0 {
        advance(TaskState::Finished);
        ctx.skip(&address, SkipReason::DepthExhausted);
        return;
    }

    advance(TaskState::Claiming);
    if !ctx.visited.try_claim(&address) {
        advance(TaskState::Finished);
        ctx.skip(&address, SkipReason::AlreadyClaimed);
        return;
    }

    advance(TaskState::Fetching);
    let page = match ctx.fetch(&address).await {
        Ok(page) => page,
        Err(error) => {
            advance(TaskState::Finished);
            ctx.counters.failed.fetch_add(1, Ordering::Relaxed);
            ctx.observer.on_fetch_failed(&address, depth, &error);
            return;
        }
    };

    ctx.counters.fetched.fetch_add(1, Ordering::Relaxed);
    ctx.observer.on_fetched(&address, depth, &page);

    advance(TaskState::Spawning);
    for link in page.links {
        spawn_task(&ctx, link, depth - 1);
    }

    advance(TaskState::Finished);
}
