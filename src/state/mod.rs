//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `ResultLog`: the append-only list of visited URLs plus the count of
//!   dropped fetches, shared by all workers of one run

mod result_log;

pub use result_log::ResultLog;
