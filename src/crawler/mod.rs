//! Crawler module: the depth-bounded concurrent crawl core
//!
//! This module contains:
//! - `VisitedSet`: atomic claim-before-fetch deduplication
//! - `TaskGroup`: completion tracking for the task tree
//! - `Crawler`: the recursive fan-out itself
//! - The `Fetcher` capability with HTTP and in-memory implementations

mod coordinator;
mod fetcher;
mod fixture;
mod parser;
mod tracker;
mod visited;

pub use coordinator::{CrawlOptions, Crawler};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use fixture::{golang_fixture, StaticFetcher};
pub use parser::extract_links;
pub use tracker::{TaskGroup, TaskGuard};
pub use visited::VisitedSet;

use crate::config::{validate, Config};
use crate::output::{CrawlSummary, TracingObserver};
use crate::CrawlerError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a complete HTTP crawl described by `config`
///
/// This is the main entry point for the binary. It will:
/// 1. Validate `config`, which may have been built or edited in code
/// 2. Build the HTTP fetcher from the user agent settings
/// 3. Crawl from the configured start URL to the configured depth
/// 4. Report per-page events through `tracing`
///
/// # Example
///
/// ```no_run
/// use depth_crawler::config::load_config;
/// use depth_crawler::crawler::run_crawl;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = run_crawl(&config, CancellationToken::new()).await?;
/// println!("fetched {} pages", summary.fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlSummary, CrawlerError> {
    validate(config)?;

    let timeout = config.crawler.fetch_timeout();
    let fetcher: Arc<dyn Fetcher<String>> =
        Arc::new(HttpFetcher::from_config(&config.user_agent, timeout)?);

    let crawler = Crawler::new(fetcher, Arc::new(TracingObserver)).with_options(CrawlOptions {
        max_concurrent_fetches: config.crawler.max_concurrent_fetches,
        fetch_timeout: Some(timeout),
    });

    Ok(crawler
        .crawl_with_cancellation(
            config.crawler.start_url.clone(),
            config.crawler.max_depth,
            cancel,
        )
        .await)
}
