//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the run loop that ties the crawl together:
//! - Validating configuration and normalizing seeds
//! - Seeding the frontier
//! - Running the worker pool to completion
//! - Handling cancellation and the optional time limit
//! - Producing the run report

use crate::config::{validate, Config};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::LinkExtractor;
use crate::crawler::politeness::{Clock, PolitenessGovernor};
use crate::crawler::worker::{run_worker, WorkerContext};
use crate::state::ResultLog;
use crate::url::normalize_url;
use crate::{ConfigError, CrawlError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every reachable URL within depth was visited
    Drained,
    /// A new URL was turned away because the budget was full
    BudgetReached,
    /// Cancelled by the caller, a signal, or the time limit
    Cancelled,
}

/// Outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Successfully visited URLs in completion order
    ///
    /// Neither the order nor, when the budget is reached, the membership is
    /// deterministic: both follow how the workers interleave.
    pub visited: Vec<String>,

    /// Fetches that failed and were dropped
    pub failed: usize,

    pub stop_reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Main crawler coordinator structure
///
/// A coordinator drives exactly one run; all run state (frontier, host
/// timers, result log) is created by [`Coordinator::run`] and dropped when
/// it returns.
pub struct Coordinator {
    config: Arc<Config>,
    seeds: Vec<Url>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `fetcher` - Page retrieval capability
    /// * `extractor` - Link extraction capability
    /// * `clock` - Time source for politeness delays
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError::Config)` - Invalid configuration, or no seed URL
    ///   survived normalization
    pub fn new(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;

        let seeds = normalize_seeds(&config.crawler.seed_urls);
        if seeds.is_empty() {
            return Err(ConfigError::Validation(
                "no valid seed URLs after normalization".to_string(),
            )
            .into());
        }

        Ok(Self {
            config: Arc::new(config),
            seeds,
            fetcher,
            extractor,
            clock,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that stops the run when cancelled
    ///
    /// Workers stop claiming, abandon in-flight waits and fetches, and
    /// record nothing further. The run still returns a valid report.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalized seeds the run will start from
    pub fn seeds(&self) -> &[Url] {
        &self.seeds
    }

    /// Runs the crawl to completion
    ///
    /// 1. Seed the frontier at depth 0
    /// 2. Spawn `concurrency` workers
    /// 3. Wait until every worker has seen the frontier drained or closed
    /// 4. Classify why the run stopped and return the report
    pub async fn run(self) -> CrawlReport {
        let started_at = Utc::now();
        let crawler = &self.config.crawler;

        let frontier = Arc::new(Frontier::new(crawler.max_urls));
        let seeded = frontier.seed(self.seeds.iter().cloned());
        tracing::info!(
            "Starting crawl: {} seeds, max depth {}, max urls {}, {} workers, {:?} per-host delay",
            seeded,
            crawler.max_depth,
            crawler.max_urls,
            crawler.concurrency,
            crawler.min_delay()
        );

        let log = Arc::new(ResultLog::new());
        let ctx = Arc::new(WorkerContext {
            frontier: frontier.clone(),
            governor: Arc::new(PolitenessGovernor::new(
                crawler.min_delay(),
                self.clock.clone(),
            )),
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
            log: log.clone(),
            filter: self.config.filter.clone(),
            max_depth: crawler.max_depth,
            cancel: self.cancel.clone(),
        });

        let watcher = tokio::spawn(watch_cancellation(
            frontier.clone(),
            self.cancel.clone(),
            crawler.time_limit(),
        ));

        let mut workers = JoinSet::new();
        for id in 0..crawler.concurrency {
            workers.spawn(run_worker(id, ctx.clone()));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task failed: {}", e);
            }
        }
        watcher.abort();

        let stop_reason = if self.cancel.is_cancelled() {
            StopReason::Cancelled
        } else if frontier.budget_refused() {
            StopReason::BudgetReached
        } else {
            StopReason::Drained
        };

        drop(ctx);
        let (visited, failed) = match Arc::try_unwrap(log) {
            Ok(log) => log.into_parts(),
            Err(shared) => (shared.snapshot(), shared.failure_count()),
        };

        let report = CrawlReport {
            visited,
            failed,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl finished ({:?}): {} pages visited, {} failed, in {:?}",
            report.stop_reason,
            report.visited.len(),
            report.failed,
            report.elapsed()
        );

        report
    }
}

/// Closes the frontier once the token is cancelled or the time limit passes
async fn watch_cancellation(
    frontier: Arc<Frontier>,
    cancel: CancellationToken,
    time_limit: Option<Duration>,
) {
    match time_limit {
        Some(limit) => {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(limit) => {
                    tracing::warn!("Time limit of {:?} reached, stopping crawl", limit);
                    cancel.cancel();
                }
            }
        }
        None => cancel.cancelled().await,
    }

    frontier.cancel();
}

/// Normalizes seed URLs, dropping the ones that cannot be crawled
fn normalize_seeds(seed_urls: &[String]) -> Vec<Url> {
    seed_urls
        .iter()
        .filter_map(|seed| match normalize_url(seed) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
            Ok(url) => {
                tracing::warn!("Ignoring seed with unsupported scheme: {}", url);
                None
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid seed {:?}: {}", seed, e);
                None
            }
        })
        .collect()
}
