//! Shared record of addresses already claimed for fetching

use crate::Address;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Concurrency-safe set of claimed addresses
///
/// The set only grows. The single way to decide "should I fetch this" is
/// [`VisitedSet::try_claim`], which checks and marks under one lock so that
/// two concurrent tasks can never both own the same address.
#[derive(Debug)]
pub struct VisitedSet<A: Address> {
    claimed: Mutex<HashSet<A>>,
}

impl<A: Address> VisitedSet<A> {
    /// Creates an empty set
    pub fn new() -> Self {
        Self {
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Claims `address` for the caller
    ///
    /// Returns `true` if the address was not yet claimed; it is now marked and
    /// the caller owns its fetch. Returns `false` without mutating anything if
    /// some task already claimed it.
    pub fn try_claim(&self, address: &A) -> bool {
        // Insert-only contents stay valid even if a holder panicked
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if claimed.contains(address) {
            return false;
        }
        claimed.insert(address.clone())
    }

    /// Number of addresses claimed so far
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A: Address> Default for VisitedSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_claim_wins() {
        let visited = VisitedSet::new();

        assert!(visited.try_claim(&"https://golang.org/".to_string()));
        assert!(!visited.try_claim(&"https://golang.org/".to_string()));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_distinct_addresses_are_independent() {
        let visited = VisitedSet::new();

        assert!(visited.try_claim(&1u32));
        assert!(visited.try_claim(&2u32));
        assert!(!visited.try_claim(&1u32));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_no_normalization() {
        let visited = VisitedSet::new();

        assert!(visited.try_claim(&"https://golang.org/".to_string()));
        assert!(visited.try_claim(&"https://golang.org".to_string()));
    }

    #[test]
    fn test_new_set_is_empty() {
        let visited: VisitedSet<String> = VisitedSet::default();
        assert!(visited.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_claims_single_winner() {
        for n in [1usize, 2, 16, 128] {
            let visited = Arc::new(VisitedSet::new());
            let barrier = Arc::new(tokio::sync::Barrier::new(n));

            let handles: Vec<_> = (0..n)
                .map(|_| {
                    let visited = Arc::clone(&visited);
                    let barrier = Arc::clone(&barrier);
                    tokio::spawn(async move {
                        barrier.wait().await;
                        visited.try_claim(&"https://golang.org/pkg/".to_string())
                    })
                })
                .collect();

            let mut winners = 0;
            for handle in handles {
                if handle.await.unwrap() {
                    winners += 1;
                }
            }

            assert_eq!(winners, 1, "expected one winner among {} claimers", n);
            assert_eq!(visited.len(), 1);
        }
    }
}
