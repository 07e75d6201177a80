//! Depth-Crawler main entry point
//!
//! This is the command-line interface for the depth-bounded crawler.

use anyhow::Context;
use clap::Parser;
use depth_crawler::config::{load_config, Config};
use depth_crawler::crawler::{golang_fixture, run_crawl, Crawler, Fetcher};
use depth_crawler::output::{print_summary, TracingObserver};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Depth-Crawler: a depth-bounded concurrent web crawler
///
/// Fetches every page reachable from the start URL within the depth budget,
/// each at most once, with fetches running in parallel.
#[derive(Parser, Debug)]
#[command(name = "depth-crawler")]
#[command(version)]
#[command(about = "A depth-bounded concurrent web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "fixture")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the configured depth budget
    #[arg(long)]
    depth: Option<i32>,

    /// Crawl the built-in golang.org sample graph instead of the network
    #[arg(long, conflicts_with = "dry_run")]
    fixture: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    if cli.fixture {
        return handle_fixture(cli.depth.unwrap_or(4), cancel).await;
    }

    let path = cli
        .config
        .context("a configuration file is required unless --fixture is given")?;

    tracing::info!("Loading configuration from: {}", path.display());
    let mut config = load_config(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, cancel).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("depth_crawler=info,warn"),
            1 => EnvFilter::new("depth_crawler=debug,info"),
            2 => EnvFilter::new("depth_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels the crawl cooperatively on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, letting in-flight fetches finish");
            cancel.cancel();
        }
    });
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Depth-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    match config.crawler.max_concurrent_fetches {
        Some(limit) => println!("  Max concurrent fetches: {}", limit),
        None => println!("  Max concurrent fetches: unbounded"),
    }
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}

/// Crawls the built-in sample graph
async fn handle_fixture(depth: i32, cancel: CancellationToken) -> anyhow::Result<()> {
    tracing::info!("Crawling built-in golang.org fixture");

    let fetcher: Arc<dyn Fetcher<String>> = Arc::new(golang_fixture());
    let crawler = Crawler::new(fetcher, Arc::new(TracingObserver));
    let summary = crawler
        .crawl_with_cancellation("https://golang.org/".to_string(), depth, cancel)
        .await;

    print_summary(&summary);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, cancel: CancellationToken) -> anyhow::Result<()> {
    let summary = run_crawl(config, cancel).await.context("Crawl failed")?;
    print_summary(&summary);
    Ok(())
}
