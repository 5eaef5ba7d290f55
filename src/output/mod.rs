//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the visited-URL list as a newline-delimited text file
//! - Printing the end-of-run summary

mod summary;
mod text;
mod traits;

pub use summary::{format_report, print_report};
pub use text::TextFileSink;
pub use traits::{VisitSink, WriteMode};

use std::io;

/// Writes a run's visited URLs to an opened sink in order and finishes it
///
/// The sink is opened before the crawl starts, so an unusable output path
/// fails the run before any page is fetched.
///
/// # Arguments
///
/// * `sink` - Destination opened with the run's `WriteMode`
/// * `urls` - Visited URLs in Result Log order
///
/// # Returns
///
/// * `Ok(usize)` - Number of URLs written
/// * `Err(io::Error)` - The sink could not be written or flushed
pub fn write_visited<S: VisitSink>(sink: &mut S, urls: &[String]) -> io::Result<usize> {
    let written = sink.append_all(urls)?;
    sink.finish()?;
    Ok(written)
}
