use crate::UrlError;
use url::Url;

/// Normalizes a raw hyperlink found on `base` into a canonical absolute URL
///
/// # Normalization Steps
///
/// 1. Trim whitespace; reject an empty href
/// 2. Resolve the href against `base` (absolute hrefs replace it)
/// 3. Reject non-hierarchical URLs (`mailto:`, `javascript:`, `tel:`, `data:`)
///    and URLs without a host
/// 4. Lowercase the scheme and host
/// 5. Remove the fragment
/// 6. An empty path becomes `/`, so `https://a.com` and `https://a.com/`
///    produce the same key
///
/// Query strings are kept verbatim: `?id=1` and `?id=2` are different pages.
///
/// # Arguments
///
/// * `base` - The page the href was found on
/// * `raw_href` - The href attribute as written in the document
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The href cannot become a crawlable URL
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://a.test/docs/").unwrap();
/// let url = normalize(&base, "../b#top").unwrap();
/// assert_eq!(url.as_str(), "https://a.test/b");
/// assert!(normalize(&base, "mailto:someone@a.test").is_err());
/// ```
pub fn normalize(base: &Url, raw_href: &str) -> Result<Url, UrlError> {
    let href = raw_href.trim();
    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    canonicalize(url)
}

/// Normalizes an absolute URL string, as used for seed URLs
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::normalize_url;
///
/// let url = normalize_url("HTTPS://A.TEST").unwrap();
/// assert_eq!(url.as_str(), "https://a.test/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;
    canonicalize(url)
}

fn canonicalize(mut url: Url) -> Result<Url, UrlError> {
    if url.cannot_be_a_base() {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    // The url crate lowercases hosts of special schemes only
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or(UrlError::MissingHost)?;
    if url.host_str() != Some(host.as_str()) {
        url.set_host(Some(&host))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    }

    url.set_fragment(None);

    if url.path().is_empty() {
        url.set_path("/");
    }

    Ok(url)
}
