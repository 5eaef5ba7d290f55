//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML link extraction
//! - The shared frontier and per-host politeness
//! - Worker pool coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod politeness;
mod worker;

pub use coordinator::{Coordinator, CrawlReport, StopReason};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use frontier::{Claim, Frontier, QueuedUrl};
pub use parser::{HtmlLinkExtractor, LinkExtractor};
pub use politeness::{Clock, PolitenessGovernor, TokioClock};

use crate::config::Config;
use crate::output::{write_visited, TextFileSink, WriteMode};
use crate::CrawlError;
use std::path::Path;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and validate the configuration
/// 2. Open the output file, before any request is made
/// 3. Seed the frontier and run the worker pool
/// 4. Stop early on Ctrl-C or the configured time limit
/// 5. Write the visited URLs to the output file
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (drained, budget reached, or cancelled)
/// * `Err(CrawlError)` - Invalid configuration, client setup failure, or the
///   output file could not be written
pub async fn run_crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let output_path = config.output.output_path.clone();
    let mode = WriteMode::from_append(config.output.append);

    let coordinator = Coordinator::new(
        config,
        Arc::new(fetcher),
        Arc::new(HtmlLinkExtractor),
        Arc::new(TokioClock),
    )?;

    let mut sink = TextFileSink::open(Path::new(&output_path), mode)?;

    let cancel = coordinator.cancellation_token();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            cancel.cancel();
        }
    });

    let report = coordinator.run().await;
    signal.abort();

    let written = write_visited(&mut sink, &report.visited)?;
    tracing::info!("Wrote {} visited URLs to {}", written, sink.path().display());

    Ok(report)
}
