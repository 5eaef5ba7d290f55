use crate::config::FilterConfig;
use crate::url::domain::host_key;
use crate::url::matcher::{matches_domain, matches_path};
use url::Url;

/// Decides whether a normalized URL may be offered to the frontier
///
/// Rules are applied in order, first rejection wins:
///
/// 1. The scheme must be `http` or `https`
/// 2. With a non-empty allow-list, the host must equal an entry or be a
///    subdomain of one
/// 3. With deny-path patterns, no pattern may match the path (see
///    [`matches_path`] for pattern semantics)
///
/// This is a pure function of its inputs.
///
/// # Examples
///
/// ```
/// use ripple_crawl::config::FilterConfig;
/// use ripple_crawl::url::is_eligible;
/// use url::Url;
///
/// let rules = FilterConfig {
///     allow_domains: vec!["a.test".to_string()],
///     deny_path_patterns: vec!["*.pdf".to_string()],
///     ..FilterConfig::default()
/// };
///
/// assert!(is_eligible(&Url::parse("https://a.test/x").unwrap(), &rules));
/// assert!(!is_eligible(&Url::parse("https://b.test/x").unwrap(), &rules));
/// assert!(!is_eligible(&Url::parse("https://a.test/x.pdf").unwrap(), &rules));
/// ```
pub fn is_eligible(url: &Url, rules: &FilterConfig) -> bool {
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    if !rules.allow_domains.is_empty() {
        let Some(host) = url.host_str() else {
            return false;
        };
        if !rules
            .allow_domains
            .iter()
            .any(|entry| matches_domain(entry, host))
        {
            return false;
        }
    }

    let path = url.path();
    !rules
        .deny_path_patterns
        .iter()
        .any(|pattern| matches_path(pattern, path))
}

/// Whether `link` points at the same host and port as `page`
///
/// Backs the `same-host-only` rule, which depends on the page a link was
/// found on and so is applied by the worker rather than [`is_eligible`].
/// Subdomains count as different hosts.
pub fn same_host(link: &Url, page: &Url) -> bool {
    match (host_key(link), host_key(page)) {
        (Some(link_host), Some(page_host)) => link_host == page_host,
        _ => false,
    }
}
