//! Fetch-extract worker loop

use crate::config::FilterConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::LinkExtractor;
use crate::crawler::politeness::PolitenessGovernor;
use crate::state::ResultLog;
use crate::url::{host_key, is_eligible, normalize, same_host};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Log progress every this many completed visits
const PROGRESS_INTERVAL: usize = 10;

/// Everything a worker shares with the rest of the pool
pub(crate) struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub governor: Arc<PolitenessGovernor>,
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn LinkExtractor>,
    pub log: Arc<ResultLog>,
    pub filter: FilterConfig,
    pub max_depth: u32,
    pub cancel: CancellationToken,
}

/// Runs one worker until the frontier is drained or the run is cancelled
///
/// Per-page failures are dropped here and never reach the coordinator.
pub(crate) async fn run_worker(id: usize, ctx: Arc<WorkerContext>) {
    tracing::debug!("Worker {} started", id);

    while let Some(claim) = ctx.frontier.claim().await {
        let url = claim.url().clone();
        let depth = claim.depth();
        let host = host_key(&url).unwrap_or_default();

        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => break,
            _ = ctx.governor.wait_turn(&host) => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => break,
            result = ctx.fetcher.fetch(&url) => result,
        };

        let html = match fetched {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Dropping {}: {}", url, e);
                ctx.log.record_failure();
                continue;
            }
        };

        let accepted = offer_links(&ctx, &url, depth, &html);

        if ctx.cancel.is_cancelled() {
            break;
        }

        let visits = ctx.log.record_visit(url.as_str());
        tracing::debug!(
            "Worker {} visited {} (depth {}, {} new links)",
            id,
            url,
            depth,
            accepted
        );

        if visits % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages visited, {} pending, {} in flight",
                visits,
                ctx.frontier.pending_len(),
                ctx.frontier.in_flight()
            );
        }

        claim.complete();
    }

    tracing::debug!("Worker {} finished", id);
}

/// Normalizes, filters and offers the links of a fetched page
///
/// # Returns
///
/// The number of links the frontier accepted
fn offer_links(ctx: &WorkerContext, page: &Url, depth: u32, html: &str) -> usize {
    if depth >= ctx.max_depth {
        return 0;
    }

    let next_depth = depth + 1;
    let mut accepted = 0;

    for href in ctx.extractor.extract_links(html, page) {
        let link = match normalize(page, &href) {
            Ok(link) => link,
            Err(e) => {
                tracing::trace!("Skipping href {:?} on {}: {}", href, page, e);
                continue;
            }
        };

        if !is_eligible(&link, &ctx.filter) {
            tracing::trace!("Filtered out {}", link);
            continue;
        }

        if ctx.filter.same_host_only && !same_host(&link, page) {
            tracing::trace!("Skipping off-host link {} on {}", link, page);
            continue;
        }

        if ctx.frontier.offer(link, next_depth) {
            accepted += 1;
        }
    }

    accepted
}
