use serde::Deserialize;
use std::time::Duration;

/// Default name of the visited-URL output file
pub const DEFAULT_OUTPUT_PATH: &str = "visited_links.txt";

/// Main configuration structure for a crawl run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Builds a configuration from seed URLs with every other option at its default
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_crawl::config::Config;
    ///
    /// let config = Config::with_seeds(vec!["https://example.com/".to_string()]);
    /// assert_eq!(config.crawler.max_depth, 2);
    /// assert_eq!(config.output.output_path, "visited_links.txt");
    /// ```
    pub fn with_seeds(seed_urls: Vec<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed_urls,
                max_depth: 2,
                max_urls: 100,
                concurrency: default_concurrency(),
                min_delay_per_host: default_min_delay(),
                time_limit_secs: None,
            },
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Crawl traversal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from, all at depth 0
    #[serde(rename = "seed-urls")]
    pub seed_urls: Vec<String>,

    /// Maximum hop count from the nearest seed
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of distinct URLs the crawl may claim
    #[serde(rename = "max-urls")]
    pub max_urls: usize,

    /// Number of concurrent workers
    #[serde(rename = "concurrency", default = "default_concurrency")]
    pub concurrency: usize,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "min-delay-per-host", default = "default_min_delay")]
    pub min_delay_per_host: u64,

    /// Stop the crawl after this many seconds
    #[serde(rename = "time-limit-secs", default)]
    pub time_limit_secs: Option<u64>,
}

impl CrawlerConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_per_host)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_min_delay() -> u64 {
    1000
}

/// Link eligibility rules
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Hosts (and their subdomains) links must stay within; empty allows all
    #[serde(rename = "allow-domains", default)]
    pub allow_domains: Vec<String>,

    /// Path patterns that exclude a link: substring, or anchored glob when
    /// the pattern contains `*`
    #[serde(rename = "deny-path-patterns", default)]
    pub deny_path_patterns: Vec<String>,

    /// Only follow links whose host (and port) match the page they were
    /// found on
    #[serde(rename = "same-host-only", default)]
    pub same_host_only: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the newline-delimited visited-URL file
    #[serde(rename = "output-path", default = "default_output_path")]
    pub output_path: String,

    /// Append to an existing file instead of starting it fresh
    #[serde(default)]
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            append: false,
        }
    }
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_user_agent() -> String {
    format!("ripple-crawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}
