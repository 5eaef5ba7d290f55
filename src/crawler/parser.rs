//! HTML link extraction
//!
//! Extraction returns hrefs exactly as written in the document. Resolution
//! against the page URL and normalization happen in the worker, so the
//! extractor stays a pure function of the document.

use scraper::{Html, Selector};
use url::Url;

/// Capability to list the raw hrefs of a document
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, html: &str, base_url: &Url) -> Vec<String>;
}

/// Extracts `<a href>` values using scraper
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `<link>`, `<script>`, `<img>` and other non-anchor references
///
/// `rel="nofollow"` links are followed.
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::{HtmlLinkExtractor, LinkExtractor};
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = HtmlLinkExtractor.extract_links(html, &base_url);
/// assert_eq!(links, vec!["/page".to_string()]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, html: &str, _base_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        extract_anchor_hrefs(&document)
    }
}

fn extract_anchor_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<String> {
        let base_url = Url::parse("https://example.com/page").unwrap();
        HtmlLinkExtractor.extract_links(html, &base_url)
    }

    #[test]
    fn test_extract_absolute_link() {
        let links = extract(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        assert_eq!(links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_relative_links_stay_raw() {
        let links = extract(r#"<html><body><a href="/other">A</a><a href="next">B</a></body></html>"#);
        assert_eq!(links, vec!["/other", "next"]);
    }

    #[test]
    fn test_skip_download_link() {
        let links = extract(r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_empty_href() {
        let links = extract(r#"<html><body><a href="">Empty</a><a href="   ">Blank</a></body></html>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_ignore_non_anchor_references() {
        let html = r#"
            <html>
            <head><link rel="stylesheet" href="/style.css"><script src="/app.js"></script></head>
            <body><img src="/logo.png"><a>No href</a></body>
            </html>
        "#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_follow_nofollow_links() {
        let links = extract(r#"<html><body><a href="/page" rel="nofollow">Link</a></body></html>"#);
        assert_eq!(links, vec!["/page"]);
    }

    #[test]
    fn test_special_schemes_are_returned_for_normalizer() {
        let links = extract(
            r#"<html><body><a href="mailto:a@b.test">M</a><a href="javascript:void(0)">J</a></body></html>"#,
        );
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_multiple_links_keep_document_order() {
        let html = r#"
            <html>
            <body>
                <nav><a href="/page1">Link 1</a></nav>
                <main><a href="/page2">Link 2</a></main>
                <footer><a href="https://other.com/page3">Link 3</a></footer>
            </body>
            </html>
        "#;
        assert_eq!(
            extract(html),
            vec!["/page1", "/page2", "https://other.com/page3"]
        );
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        // The parser reopens the unclosed anchor inside <p>, so /ok appears
        // twice; the frontier collapses repeats
        let links = extract(r#"<div><a href="/ok">unclosed <p><a href="/also">"#);
        assert_eq!(links, vec!["/ok", "/ok", "/also"]);
    }
}
