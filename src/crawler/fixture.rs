//! In-memory fetcher over a canned link graph

use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::Address;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Fetcher that serves pages from a fixed map
///
/// Unknown addresses fail with [`FetchError::NotFound`]. Every call is
/// counted so callers can check how often each address was fetched.
#[derive(Debug)]
pub struct StaticFetcher<A: Address> {
    pages: HashMap<A, FetchedPage<A>>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<A, usize>>,
}

impl<A: Address> StaticFetcher<A> {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            delay: None,
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a resolvable page
    pub fn with_page(mut self, address: A, body: impl Into<String>, links: Vec<A>) -> Self {
        self.pages.insert(address, FetchedPage::new(body, links));
        self
    }

    /// Makes every fetch sleep before answering, so sibling tasks overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `address` was fetched
    pub fn fetch_count(&self, address: &A) -> usize {
        self.lock_calls().get(address).copied().unwrap_or(0)
    }

    /// Total fetch calls across all addresses
    pub fn total_fetches(&self) -> usize {
        self.lock_calls().values().sum()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, HashMap<A, usize>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Address> Default for StaticFetcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: Address> Fetcher<A> for StaticFetcher<A> {
    async fn fetch(&self, address: &A) -> Result<FetchedPage<A>, FetchError> {
        *self.lock_calls().entry(address.clone()).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.pages
            .get(address)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                address: address.to_string(),
            })
    }
}

/// The four-page golang.org graph
///
/// The root links to `pkg/` and `cmd/`; `pkg/` links back to the root and on
/// to `cmd/`, `pkg/fmt/` and `pkg/os/`, both of which link back to the root
/// and `pkg/`. `cmd/` is not resolvable.
pub fn golang_fixture() -> StaticFetcher<String> {
    const ROOT: &str = "https://golang.org/";
    const PKG: &str = "https://golang.org/pkg/";
    const CMD: &str = "https://golang.org/cmd/";
    const FMT: &str = "https://golang.org/pkg/fmt/";
    const OS: &str = "https://golang.org/pkg/os/";

    let links = |targets: &[&str]| targets.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    StaticFetcher::new()
        .with_page(
            ROOT.to_string(),
            "The Go Programming Language",
            links(&[PKG, CMD]),
        )
        .with_page(PKG.to_string(), "Packages", links(&[ROOT, CMD, FMT, OS]))
        .with_page(FMT.to_string(), "Package fmt", links(&[ROOT, PKG]))
        .with_page(OS.to_string(), "Package os", links(&[ROOT, PKG]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_known_pages() {
        let fetcher = golang_fixture();
        let page = fetcher.fetch(&"https://golang.org/".to_string()).await.unwrap();

        assert_eq!(page.body, "The Go Programming Language");
        assert_eq!(
            page.links,
            vec![
                "https://golang.org/pkg/".to_string(),
                "https://golang.org/cmd/".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_address_is_not_found() {
        let fetcher = golang_fixture();
        let err = fetcher
            .fetch(&"https://golang.org/cmd/".to_string())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "not found: https://golang.org/cmd/");
    }

    #[tokio::test]
    async fn test_counts_calls() {
        let fetcher = StaticFetcher::new().with_page(1u32, "one", vec![2]);

        let _ = fetcher.fetch(&1).await;
        let _ = fetcher.fetch(&1).await;
        let _ = fetcher.fetch(&2).await;

        assert_eq!(fetcher.fetch_count(&1), 2);
        assert_eq!(fetcher.fetch_count(&2), 1);
        assert_eq!(fetcher.fetch_count(&3), 0);
        assert_eq!(fetcher.total_fetches(), 3);
    }
}
