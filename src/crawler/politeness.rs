//! Per-host politeness delays
//!
//! Every host gets its own timer behind its own async mutex. A worker holds
//! the host's lock for the whole check-sleep-record sequence, so workers
//! aiming at one host go through it one at a time while workers on other
//! hosts proceed untouched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Source of time for the politeness governor
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Last-request time of one host
type HostTimer = Arc<tokio::sync::Mutex<Option<Instant>>>;

/// Enforces a minimum delay between requests to the same host
pub struct PolitenessGovernor {
    min_delay: Duration,
    clock: Arc<dyn Clock>,
    hosts: Mutex<HashMap<String, HostTimer>>,
}

impl PolitenessGovernor {
    pub fn new(min_delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_delay,
            clock,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Waits until `host` may be requested again, then stamps it
    ///
    /// Sleeps for whatever remains of the minimum delay since the host's
    /// last recorded request. Recording "now" is always the final step, so
    /// the next caller for this host measures from this request.
    ///
    /// # Returns
    ///
    /// The time spent sleeping
    pub async fn wait_turn(&self, host: &str) -> Duration {
        let timer = self.timer(host);
        let mut last_request = timer.lock().await;

        let mut waited = Duration::ZERO;
        if let Some(previous) = *last_request {
            let elapsed = self.clock.now().saturating_duration_since(previous);
            if elapsed < self.min_delay {
                waited = self.min_delay - elapsed;
                tracing::trace!("Waiting {:?} before requesting {}", waited, host);
                self.clock.sleep(waited).await;
            }
        }

        *last_request = Some(self.clock.now());
        waited
    }

    /// Returns the recorded last-request time of a host, if any
    ///
    /// Returns `None` as well while another worker holds the host's turn.
    pub fn last_request(&self, host: &str) -> Option<Instant> {
        let hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        let timer = hosts.get(host)?;
        let last_request = timer.try_lock().ok()?;
        *last_request
    }

    /// Number of distinct hosts seen so far
    pub fn host_count(&self) -> usize {
        self.hosts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn timer(&self, host: &str) -> HostTimer {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts.entry(host.to_string()).or_default().clone()
    }
}
