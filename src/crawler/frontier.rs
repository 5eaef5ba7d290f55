//! Crawl frontier: pending queue, visited set and drain detection
//!
//! All frontier state sits behind one mutex, so the dedup/budget check in
//! [`Frontier::offer`] and the drain check in [`Frontier::claim`] each run as
//! a single critical section. The lock is never held across an await.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use url::Url;

/// A URL waiting in the frontier, with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Normalized URL; its string form is the dedup key
    pub url: Url,

    /// Hops from the nearest seed
    pub depth: u32,
}

#[derive(Debug, Default)]
struct FrontierState {
    pending: VecDeque<QueuedUrl>,
    visited: HashSet<String>,
    in_flight: usize,
    closed: bool,
    over_budget: bool,
}

/// Shared work queue of one crawl run
///
/// A URL enters `visited` exactly once, when the frontier accepts it (as a
/// seed or through `offer`). `visited` never grows past `max_urls`, and
/// everything pending is already counted in it, so claims never exceed the
/// budget.
///
/// When more URLs are reachable than the budget allows, which ones fill it
/// depends on the order concurrent workers offer their links, so the set of
/// visited URLs can differ between runs.
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify: Notify,
    max_urls: usize,
}

/// A URL handed to a worker
///
/// The claim counts as in flight until it is completed or dropped. Idle
/// workers keep waiting while any claim is outstanding, since its page may
/// still yield new links.
#[derive(Debug)]
pub struct Claim<'a> {
    frontier: &'a Frontier,
    item: QueuedUrl,
}

impl Claim<'_> {
    pub fn url(&self) -> &Url {
        &self.item.url
    }

    pub fn depth(&self) -> u32 {
        self.item.depth
    }

    /// Marks the claimed URL as processed
    ///
    /// Offers for links found on the page must happen before this call.
    pub fn complete(self) {}
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.frontier.finish_claim();
    }
}

impl Frontier {
    pub fn new(max_urls: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            notify: Notify::new(),
            max_urls,
        }
    }

    /// Enqueues seed URLs at depth 0
    ///
    /// Duplicates collapse, and seeds past the URL budget are dropped.
    ///
    /// # Returns
    ///
    /// The number of seeds accepted
    pub fn seed<I>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        urls.into_iter().filter(|url| self.offer(url.clone(), 0)).count()
    }

    /// Atomically dedups, checks the budget and enqueues
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and within budget; it is now pending
    /// * `false` - Already visited, budget exhausted, or frontier closed;
    ///   nothing changed
    pub fn offer(&self, url: Url, depth: u32) -> bool {
        {
            let mut state = self.lock();
            if state.closed || state.visited.contains(url.as_str()) {
                return false;
            }
            if state.visited.len() >= self.max_urls {
                state.over_budget = true;
                return false;
            }

            state.visited.insert(url.as_str().to_string());
            state.pending.push_back(QueuedUrl { url, depth });
        }

        self.notify.notify_one();
        true
    }

    /// Takes the next pending URL, waiting while other claims are in flight
    ///
    /// # Returns
    ///
    /// * `Some(Claim)` - The oldest pending URL (breadth-first order)
    /// * `None` - Nothing is pending and nothing is in flight, or the
    ///   frontier was cancelled
    pub async fn claim(&self) -> Option<Claim<'_>> {
        loop {
            // Register interest before checking, so a notification sent
            // between the check and the await is not lost
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }

                if let Some(item) = state.pending.pop_front() {
                    state.in_flight += 1;
                    return Some(Claim {
                        frontier: self,
                        item,
                    });
                }

                if state.in_flight == 0 {
                    // Only in-flight claims can produce work, so none ever will
                    state.closed = true;
                    drop(state);
                    self.notify.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Stops handing out claims and wakes every waiting worker
    ///
    /// Outstanding claims stay valid and still complete normally.
    pub fn cancel(&self) {
        self.lock().closed = true;
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of URLs accepted so far, seeds included
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().visited.contains(url)
    }

    pub fn max_urls(&self) -> usize {
        self.max_urls
    }

    pub fn budget_exhausted(&self) -> bool {
        self.lock().visited.len() >= self.max_urls
    }

    /// Whether a new URL was ever turned away because the budget was full
    ///
    /// Unlike [`Frontier::budget_exhausted`], this stays false when the
    /// reachable set happens to be exactly `max_urls` URLs.
    pub fn budget_refused(&self) -> bool {
        self.lock().over_budget
    }

    fn finish_claim(&self) {
        let drained = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0 && state.pending.is_empty()
        };

        if drained {
            self.notify.notify_waiters();
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
