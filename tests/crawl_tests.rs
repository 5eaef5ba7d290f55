//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end through the real reqwest fetcher and the scraper
//! link extractor.

use ripple_crawl::config::Config;
use ripple_crawl::crawler::{FetchError, Fetcher, HttpFetcher};
use ripple_crawl::{run_crawl, StopReason};
use std::collections::HashSet;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seed` into `dir`
fn create_test_config(seed: &str, dir: &TempDir) -> Config {
    let mut config = Config::with_seeds(vec![seed.to_string()]);
    config.crawler.max_depth = 2;
    config.crawler.max_urls = 50;
    config.crawler.concurrency = 3;
    config.crawler.min_delay_per_host = 10; // Very short for testing
    config.fetch.timeout_secs = 5;
    config.output.output_path = dir
        .path()
        .join("visited_links.txt")
        .to_string_lossy()
        .into_owned();
    config
}

fn html(body: &str) -> ResponseTemplate {
    // set_body_string would force text/plain
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn read_lines(config: &Config) -> Vec<String> {
    std::fs::read_to_string(&config.output.output_path)
        .expect("Failed to read output file")
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r##"<a href="/page1">Page 1</a> <a href="page2">Page 2</a> <a href="#top">Top</a>"##,
    )
    .await;
    mount_page(&mock_server, "/page1", r#"<a href="/page3">Page 3</a><a href="/">Home</a>"#).await;
    mount_page(&mock_server, "/page2", r#"<a href="/page1">Page 1</a>"#).await;
    mount_page(&mock_server, "/page3", r#"<a href="/page4">Too deep</a>"#).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);

    let report = run_crawl(config.clone()).await.expect("Crawl failed");

    let expected: HashSet<String> = ["/", "/page1", "/page2", "/page3"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    let visited: HashSet<String> = report.visited.iter().cloned().collect();

    assert_eq!(visited, expected);
    assert_eq!(report.visited.len(), 4, "each URL is visited once");
    assert_eq!(report.visited[0], format!("{}/", base_url));
    assert_eq!(report.failed, 0);
    assert_eq!(report.stop_reason, StopReason::Drained);

    assert_eq!(read_lines(&config), report.visited);
}

#[tokio::test]
async fn test_failed_pages_are_not_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Gone</a><a href="/image.png">Img</a><a href="/ok">OK</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", "<p>fine</p>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89u8, 0x50, 0x4e, 0x47], "image/png"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);

    let report = run_crawl(config.clone()).await.expect("Crawl failed");

    let visited: HashSet<&str> = report.visited.iter().map(String::as_str).collect();
    assert_eq!(visited.len(), 2);
    assert!(visited.contains(format!("{}/", base_url).as_str()));
    assert!(visited.contains(format!("{}/ok", base_url).as_str()));
    assert_eq!(report.failed, 2);

    assert_eq!(read_lines(&config).len(), 2);
}

#[tokio::test]
async fn test_allow_domains_keeps_crawl_on_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="https://elsewhere.invalid/x">Off-site</a><a href="/local">Local</a>"#,
    )
    .await;
    mount_page(&mock_server, "/local", "<p>local</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base_url, &dir);
    config.filter.allow_domains = vec!["127.0.0.1".to_string()];

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.visited.len(), 2);
    assert!(report.visited.iter().all(|u| u.starts_with(&base_url)));
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn test_deny_path_patterns() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/private/area">Private</a><a href="/report.pdf">PDF</a><a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&mock_server, "/public", "<p>public</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base_url, &dir);
    config.filter.deny_path_patterns = vec!["/private".to_string(), "*.pdf".to_string()];

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(
        report.visited,
        vec![format!("{}/", base_url), format!("{}/public", base_url)]
    );
}

#[tokio::test]
async fn test_budget_limits_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 0..10 {
        mount_page(&mock_server, &format!("/p{}", i), "<p>leaf</p>").await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base_url, &dir);
    config.crawler.max_urls = 4;

    let report = run_crawl(config.clone()).await.expect("Crawl failed");

    assert_eq!(report.visited.len(), 4);
    assert_eq!(report.stop_reason, StopReason::BudgetReached);
    assert_eq!(read_lines(&config).len(), 4);
}

#[tokio::test]
async fn test_append_mode_keeps_previous_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/", "<p>only page</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base_url, &dir);
    config.output.append = true;
    std::fs::write(&config.output.output_path, "https://previous.test/\n").unwrap();

    run_crawl(config.clone()).await.expect("Crawl failed");

    assert_eq!(
        read_lines(&config),
        vec!["https://previous.test/".to_string(), format!("{}/", base_url)]
    );
}

#[tokio::test]
async fn test_unwritable_output_fails_before_fetching() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(html(r#"<a href="/next">Next</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base_url, &dir);
    config.output.output_path = dir
        .path()
        .join("missing")
        .join("visited_links.txt")
        .to_string_lossy()
        .into_owned();

    let result = run_crawl(config).await;

    assert!(matches!(result, Err(ripple_crawl::CrawlError::Io(_))));
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "crawl fetched {} pages", requests.len());
}

#[tokio::test]
async fn test_http_fetcher_outcomes() {
    let mock_server = MockServer::start().await;
    let base_url = Url::parse(&mock_server.uri()).unwrap();

    mount_page(&mock_server, "/page", "<p>hello</p>").await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&Config::with_seeds(vec![]).fetch).unwrap();

    let body = fetcher.fetch(&base_url.join("/page").unwrap()).await.unwrap();
    assert!(body.contains("hello"));

    let error = fetcher.fetch(&base_url.join("/error").unwrap()).await;
    assert!(matches!(error, Err(FetchError::Status { status: 503, .. })));

    let json = fetcher.fetch(&base_url.join("/data.json").unwrap()).await;
    assert!(matches!(json, Err(FetchError::NotHtml { .. })));
}

#[tokio::test]
async fn test_http_fetcher_timeout() {
    let mock_server = MockServer::start().await;
    let base_url = Url::parse(&mock_server.uri()).unwrap();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late</p>").set_delay(std::time::Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = Config::with_seeds(vec![]);
    config.fetch.timeout_secs = 1;
    let fetcher = HttpFetcher::new(&config.fetch).unwrap();

    let result = fetcher.fetch(&base_url.join("/slow").unwrap()).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}
