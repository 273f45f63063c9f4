//! Crawler module for breadth-first crawl orchestration
//!
//! This module contains the concurrency core:
//! - Level-synchronized BFS orchestration
//! - The dynamic join barrier used per level
//! - The two fixed-size worker pools
//! - The per-host download cap

mod barrier;
mod limiter;
mod orchestrator;
mod pool;
mod state;

pub use barrier::LevelBarrier;
pub use limiter::HostLimiter;
pub use orchestrator::Crawler;
pub use pool::WorkerPool;
pub use state::CrawlResult;

use crate::config::CrawlerConfig;
use crate::fetch::Downloader;
use std::sync::Arc;

/// Runs a single crawl and shuts the crawler down afterwards.
///
/// Convenience for drivers that need exactly one crawl; long-lived callers
/// should construct a [`Crawler`] and reuse it across calls.
pub async fn crawl_once(
    downloader: Arc<dyn Downloader>,
    config: CrawlerConfig,
    start_url: &str,
    depth: u32,
) -> crate::Result<CrawlResult> {
    let crawler = Crawler::new(downloader, config)?;
    let result = crawler.download(start_url, depth).await;
    crawler.close().await;
    result
}
