//! Depth-Crawler: a depth-bounded concurrent crawl core
//!
//! This crate recursively discovers and fetches linked resources from a start
//! address, up to a fixed depth, fetching every distinct address at most once
//! while sibling fetches proceed in parallel.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;

/// An opaque, comparable crawl target
///
/// Two addresses name the same target if and only if they compare equal.
/// No normalization is applied by the crawl core.
pub trait Address: Eq + Hash + Clone + Debug + Display + Send + Sync + 'static {}

impl<T> Address for T where T: Eq + Hash + Clone + Debug + Display + Send + Sync + 'static {}

/// Main error type for Depth-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Depth-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    CrawlOptions, Crawler, FetchError, FetchedPage, Fetcher, HttpFetcher, StaticFetcher,
    TaskGroup, VisitedSet,
};
pub use output::{CrawlObserver, CrawlSummary, SkipReason};
pub use state::TaskState;
