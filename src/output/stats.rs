//! Crawl summary and its console report

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of one complete crawl invocation
///
/// Produced only after every spawned task has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Start address, rendered for display
    pub start: String,

    /// Depth budget given to the start address
    pub depth: i32,

    /// Successful fetches
    pub fetched: usize,

    /// Failed fetches
    pub failed: usize,

    /// Tasks that found their address already claimed
    pub skipped_duplicate: usize,

    /// Tasks that started with no depth budget left
    pub skipped_depth: usize,

    /// Tasks that observed cancellation before doing any work
    pub cancelled: usize,

    /// Every task registered with the completion tracker, the root included
    pub tasks_spawned: usize,

    /// Size of the visited set when the crawl ended
    pub addresses_claimed: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Wall-clock time between start and completion
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Fetches that reported an outcome, successful or not
    pub fn fetches_attempted(&self) -> usize {
        self.fetched + self.failed
    }

    /// Percentage of attempted fetches that succeeded; `0.0` when none were attempted
    pub fn success_rate(&self) -> f64 {
        match self.fetches_attempted() {
            0 => 0.0,
            attempted => (self.fetched as f64 / attempted as f64) * 100.0,
        }
    }

    /// Tasks that reached Finished; equals `tasks_spawned` for a completed crawl
    pub fn tasks_finished(&self) -> usize {
        self.fetched + self.failed + self.skipped_duplicate + self.skipped_depth + self.cancelled
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Start: {} (depth {})", summary.start, summary.depth);
    println!("Started: {}", summary.started_at.to_rfc3339());
    println!("Duration: {:.3}s", summary.duration().as_secs_f64());
    println!();

    println!("Tasks:");
    println!("  Spawned: {}", summary.tasks_spawned);
    println!("  Fetched: {}", summary.fetched);
    println!("  Failed: {}", summary.failed);
    println!("  Already claimed: {}", summary.skipped_duplicate);
    println!("  Depth exhausted: {}", summary.skipped_depth);
    if summary.cancelled > 0 {
        println!("  Cancelled: {}", summary.cancelled);
    }
    println!();

    println!("Addresses claimed: {}", summary.addresses_claimed);
    println!(
        "Success Rate: {:.1}% ({} / {} fetches succeeded)",
        summary.success_rate(),
        summary.fetched,
        summary.fetches_attempted()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_summary() -> CrawlSummary {
        let started_at = Utc::now();
        CrawlSummary {
            start: "https://golang.org/".to_string(),
            depth: 4,
            fetched: 4,
            failed: 1,
            skipped_duplicate: 7,
            skipped_depth: 2,
            cancelled: 0,
            tasks_spawned: 14,
            addresses_claimed: 5,
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(1500),
        }
    }

    #[test]
    fn test_tasks_finished_sums_outcomes() {
        let summary = create_test_summary();
        assert_eq!(summary.tasks_finished(), 14);
        assert_eq!(summary.tasks_finished(), summary.tasks_spawned);
    }

    #[test]
    fn test_success_rate_uses_attempted_fetches() {
        let mut summary = create_test_summary();
        // One claimed address never reported an outcome
        summary.addresses_claimed = 6;

        assert_eq!(summary.fetches_attempted(), 5);
        assert!((summary.success_rate() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_with_no_fetches() {
        let mut summary = create_test_summary();
        summary.fetched = 0;
        summary.failed = 0;
        assert_eq!(summary.success_rate(), 0.0);
    }

    #[test]
    fn test_duration() {
        let summary = create_test_summary();
        assert_eq!(summary.duration(), Duration::from_millis(1500));
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let mut summary = create_test_summary();
        summary.finished_at = summary.started_at - chrono::Duration::seconds(1);
        assert_eq!(summary.duration(), Duration::ZERO);
    }
}
