use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Append-only record of the pages a crawl visited
///
/// Workers append concurrently; the order of entries is the order visits
/// completed, which is not the discovery order.
#[derive(Debug, Default)]
pub struct ResultLog {
    visited: Mutex<Vec<String>>,
    failed: AtomicUsize,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a visited URL and returns the number of visits recorded so far
    pub fn record_visit(&self, url: &str) -> usize {
        let mut visited = self.visited.lock().unwrap_or_else(PoisonError::into_inner);
        visited.push(url.to_string());
        visited.len()
    }

    /// Counts a fetch that failed and was dropped
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn visit_count(&self) -> usize {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Returns a copy of the visits recorded so far
    pub fn snapshot(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consumes the log, returning visits and the failure count
    pub fn into_parts(self) -> (Vec<String>, usize) {
        let visited = self
            .visited
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (visited, self.failed.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_visit_keeps_order() {
        let log = ResultLog::new();
        assert_eq!(log.record_visit("https://a.test/"), 1);
        assert_eq!(log.record_visit("https://a.test/b"), 2);

        assert_eq!(log.snapshot(), vec!["https://a.test/", "https://a.test/b"]);
    }

    #[test]
    fn test_failures_are_counted_separately() {
        let log = ResultLog::new();
        log.record_visit("https://a.test/");
        log.record_failure();
        log.record_failure();

        let (visited, failed) = log.into_parts();
        assert_eq!(visited.len(), 1);
        assert_eq!(failed, 2);
    }

    #[test]
    fn test_concurrent_appends() {
        let log = Arc::new(ResultLog::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for page in 0..25 {
                        log.record_visit(&format!("https://a.test/{}/{}", worker, page));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.visit_count(), 200);
    }
}
