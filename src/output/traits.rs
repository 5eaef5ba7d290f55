//! Persistence sink traits
//!
//! A sink receives visited URLs one at a time, in Result Log order, and is
//! finished once at the end of a run.

use std::io;

/// How a sink treats an existing output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Start a fresh file for every run
    #[default]
    Truncate,
    /// Keep previous contents and add this run's URLs after them
    Append,
}

impl WriteMode {
    pub fn from_append(append: bool) -> Self {
        if append {
            Self::Append
        } else {
            Self::Truncate
        }
    }
}

/// Append-only destination for visited URLs
pub trait VisitSink {
    /// Writes one normalized URL
    fn append(&mut self, url: &str) -> io::Result<()>;

    /// Flushes everything written so far to durable storage
    fn finish(&mut self) -> io::Result<()>;

    /// Writes a batch of URLs in order
    fn append_all(&mut self, urls: &[String]) -> io::Result<usize> {
        for url in urls {
            self.append(url)?;
        }
        Ok(urls.len())
    }
}

impl VisitSink for Vec<String> {
    fn append(&mut self, url: &str) -> io::Result<()> {
        self.push(url.to_string());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}
