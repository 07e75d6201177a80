//! Output module for crawl events and results
//!
//! This module handles:
//! - The observer interface the crawl core reports per-task events to
//! - Stock observers (tracing logs, in-memory recording)
//! - The end-of-crawl summary and its console rendering

mod observers;
pub mod stats;
mod traits;

pub use observers::{CrawlEvent, RecordingObserver, TracingObserver};
pub use stats::{print_summary, CrawlSummary};
pub use traits::{CrawlObserver, SkipReason};
