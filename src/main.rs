//! Wavecrawl main entry point
//!
//! Command-line driver for the breadth-first crawler.

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wavecrawl::config::CrawlerConfig;
use wavecrawl::crawler::{crawl_once, CrawlResult};
use wavecrawl::fetch::HttpDownloader;

/// Wavecrawl: a level-synchronized breadth-first site crawler
///
/// Downloads pages starting from URL, following links one BFS level at a
/// time up to DEPTH levels, and reports which pages succeeded and which
/// failed.
#[derive(Parser, Debug)]
#[command(name = "wavecrawl")]
#[command(version)]
#[command(about = "A level-synchronized breadth-first site crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    url: String,

    /// Number of BFS levels to crawl
    #[arg(value_name = "DEPTH", default_value_t = 1)]
    depth: u32,

    /// Size of the download worker pool
    #[arg(value_name = "DOWNLOADS", default_value_t = 1)]
    downloads: usize,

    /// Size of the link-extraction worker pool
    #[arg(value_name = "EXTRACTORS", default_value_t = 1)]
    extractors: usize,

    /// Maximum concurrent downloads against a single host
    #[arg(value_name = "PER_HOST", default_value_t = 1)]
    per_host: usize,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the crawl result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let downloader = Arc::new(HttpDownloader::new().context("failed to build HTTP client")?);
    let config = CrawlerConfig {
        download_workers: cli.downloads,
        extract_workers: cli.extractors,
        per_host: cli.per_host,
    };

    let result = crawl_once(downloader, config, &cli.url, cli.depth).await?;

    if cli.json {
        print_json(&result)?;
    } else {
        print_plain(&result);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wavecrawl=info,warn"),
            1 => EnvFilter::new("wavecrawl=debug,info"),
            2 => EnvFilter::new("wavecrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Machine-readable rendering of a crawl result
#[derive(Serialize)]
struct Report<'a> {
    downloaded: &'a [String],
    errors: BTreeMap<&'a str, String>,
}

fn print_json(result: &CrawlResult) -> anyhow::Result<()> {
    let report = Report {
        downloaded: &result.downloaded,
        errors: result
            .errors
            .iter()
            .map(|(url, error)| (url.as_str(), error.to_string()))
            .collect(),
    };

    let rendered =
        serde_json::to_string_pretty(&report).context("failed to serialize crawl report")?;
    println!("{rendered}");
    Ok(())
}

fn print_plain(result: &CrawlResult) {
    println!("Downloaded {} pages:", result.downloaded.len());
    for url in &result.downloaded {
        println!("  {url}");
    }

    if !result.errors.is_empty() {
        // BTreeMap for stable ordering of the failure listing
        let failures: BTreeMap<_, _> = result.errors.iter().collect();
        println!("\nFailed {} pages:", failures.len());
        for (url, error) in failures {
            println!("  {url}: {error}");
        }
    }
}
