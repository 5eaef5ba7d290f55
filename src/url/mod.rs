//! URL handling module for Ripple Crawl
//!
//! This module provides href normalization, host extraction, domain and path
//! matching, and the link eligibility filter.

mod domain;
mod filter;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, host_key};
pub use filter::{is_eligible, same_host};
pub use matcher::{matches_domain, matches_path};
pub use normalize::{normalize, normalize_url};
