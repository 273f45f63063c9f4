//! Wavecrawl: a level-synchronized breadth-first site crawler
//!
//! This crate implements a concurrent, depth-bounded crawler that downloads
//! pages and extracts their links on two independently sized worker pools,
//! advancing one BFS level at a time.

pub mod config;
pub mod crawler;
pub mod fetch;

use std::collections::HashMap;
use thiserror::Error;

/// Systemic errors returned by [`Crawler`](crawler::Crawler) entry points.
///
/// Per-page failures are never surfaced here; they land in the
/// [`CrawlResult`](crawler::CrawlResult) error map instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("start URL must not be empty")]
    EmptyStartUrl,

    #[error("depth must be at least 1")]
    ZeroDepth,

    #[error("crawler has been closed")]
    Closed,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Recoverable per-page errors (download or extraction failure)
///
/// One entry of this type is recorded per failed URL; a failure never aborts
/// the crawl that observed it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to extract links from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Map from URL to the error that made it fail
pub type ErrorMap = HashMap<String, FetchError>;

// Re-export commonly used types
pub use config::CrawlerConfig;
pub use crawler::{CrawlResult, Crawler};
pub use fetch::{Document, Downloader, HttpDownloader};
