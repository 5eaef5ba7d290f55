//! Ripple Crawl main entry point
//!
//! This is the command-line interface for the Ripple Crawl web crawler.

use anyhow::{bail, Context};
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, validate, Config};
use ripple_crawl::output::print_report;
use ripple_crawl::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple Crawl: a polite, bounded breadth-first web crawler
///
/// Ripple Crawl starts from one or more seed URLs, follows links breadth-first
/// up to a maximum depth and URL budget, spaces out requests to each host,
/// and writes every visited URL to a text file.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A polite, bounded breadth-first web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to start from (repeatable; replaces the config file's seeds)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Maximum link depth from the seeds
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of distinct URLs to visit
    #[arg(long)]
    max_urls: Option<usize>,

    /// Number of concurrent workers
    #[arg(long)]
    concurrency: Option<usize>,

    /// Only follow links on the same host as the page they appear on
    #[arg(long)]
    same_host_only: bool,

    /// Output file for visited URLs
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if !self.seeds.is_empty() {
            config.crawler.seed_urls = self.seeds.clone();
        }
        if let Some(max_depth) = self.max_depth {
            config.crawler.max_depth = max_depth;
        }
        if let Some(max_urls) = self.max_urls {
            config.crawler.max_urls = max_urls;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.concurrency = concurrency;
        }
        if self.same_host_only {
            config.filter.same_host_only = true;
        }
        if let Some(output) = &self.output {
            config.output.output_path = output.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            if cli.seeds.is_empty() {
                bail!("no configuration file given and no --seed URLs");
            }
            Config::with_seeds(Vec::new())
        }
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let output_path = config.output.output_path.clone();
    let report = run_crawl(config).await.map_err(|e| {
        tracing::error!("Crawl failed: {}", e);
        e
    })?;

    if !cli.quiet {
        print_report(&report, &output_path);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn print_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Ripple Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", crawler.max_depth);
    println!("  Max URLs: {}", crawler.max_urls);
    println!("  Concurrency: {}", crawler.concurrency);
    println!("  Min delay per host: {}ms", crawler.min_delay_per_host);
    match crawler.time_limit_secs {
        Some(secs) => println!("  Time limit: {}s", secs),
        None => println!("  Time limit: none"),
    }

    println!("\nSeeds ({}):", crawler.seed_urls.len());
    for seed in &crawler.seed_urls {
        println!("  - {}", seed);
    }

    println!("\nFilter:");
    if config.filter.allow_domains.is_empty() {
        println!("  Allowed domains: any");
    } else {
        println!("  Allowed domains: {}", config.filter.allow_domains.join(", "));
    }
    println!("  Same host only: {}", config.filter.same_host_only);
    println!(
        "  Denied path patterns: {}",
        config.filter.deny_path_patterns.len()
    );
    for pattern in &config.filter.deny_path_patterns {
        println!("    * {}", pattern);
    }

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}s", config.fetch.timeout_secs);

    println!("\nOutput:");
    println!("  Path: {}", config.output.output_path);
    println!("  Append: {}", config.output.append);

    println!("\n✓ Configuration is valid");
}
