//! Crawl orchestration
//!
//! The orchestrator drives the breadth-first loop: it dedups each level's
//! frontier against the visited set, fans downloads out to the download pool,
//! lets successful downloads fan extractions out to the extraction pool, and
//! blocks on the level barrier until every task of the level, including
//! extractions registered mid-wait, has finished.

use crate::config::{validate, CrawlerConfig};
use crate::crawler::barrier::LevelBarrier;
use crate::crawler::limiter::HostLimiter;
use crate::crawler::pool::WorkerPool;
use crate::crawler::state::{CrawlResult, CrawlState};
use crate::fetch::{Document, Downloader};
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;

/// Grace period per shutdown phase, applied to each pool.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// Breadth-first crawl orchestrator.
///
/// The two worker pools are created once at construction and reused across
/// `download` calls until [`close`](Crawler::close). All per-crawl state is
/// scoped to a single call, so concurrent crawls on one `Crawler` are safe.
pub struct Crawler {
    downloader: Arc<dyn Downloader>,
    download_pool: Arc<WorkerPool>,
    extract_pool: Arc<WorkerPool>,
    per_host: usize,
}

impl Crawler {
    /// Creates a crawler with the given downloader and pool configuration.
    ///
    /// Fails with a validation error before any worker is spawned if a pool
    /// size or the per-host cap is zero.
    pub fn new(downloader: Arc<dyn Downloader>, config: CrawlerConfig) -> crate::Result<Self> {
        validate(&config)?;

        Ok(Self {
            downloader,
            download_pool: Arc::new(WorkerPool::new("download", config.download_workers)),
            extract_pool: Arc::new(WorkerPool::new("extract", config.extract_workers)),
            per_host: config.per_host,
        })
    }

    /// Crawls breadth-first from `start_url` for `depth` levels.
    ///
    /// Every URL is downloaded at most once per call regardless of how many
    /// pages link to it. Page-level failures never abort the crawl; they are
    /// reported in the result's error map. Only misuse (an empty start URL,
    /// a zero depth, or a crawler that is already closed) returns `Err`.
    pub async fn download(&self, start_url: &str, depth: u32) -> crate::Result<CrawlResult> {
        if start_url.is_empty() {
            return Err(CrawlError::EmptyStartUrl);
        }
        if depth == 0 {
            return Err(CrawlError::ZeroDepth);
        }
        if self.download_pool.is_closed() || self.extract_pool.is_closed() {
            return Err(CrawlError::Closed);
        }

        let state = Arc::new(CrawlState::new());
        let barrier = Arc::new(LevelBarrier::new());
        let limiter = Arc::new(HostLimiter::new(self.per_host));

        let mut frontier = vec![start_url.to_string()];

        for level in 1..=depth {
            // The final level downloads pages but follows no links.
            let follow_links = level < depth;
            let mut dispatched = 0usize;

            for url in frontier {
                if !state.mark_visited(&url) {
                    continue;
                }

                barrier.register();
                let task = download_page(
                    url.clone(),
                    follow_links,
                    Arc::clone(&self.downloader),
                    Arc::clone(&self.extract_pool),
                    Arc::clone(&limiter),
                    Arc::clone(&state),
                    Arc::clone(&barrier),
                );
                if self.download_pool.submit(task) {
                    dispatched += 1;
                } else {
                    barrier.arrive();
                    state.record_error(
                        &url,
                        std::io::Error::new(std::io::ErrorKind::Interrupted, "crawler shut down")
                            .into(),
                    );
                }
            }

            tracing::debug!("level {level}/{depth}: dispatched {dispatched} downloads");
            barrier.wait().await;

            frontier = state.take_discovered();
            if frontier.is_empty() {
                break;
            }
        }

        let result = state.finish();
        tracing::info!(
            "crawl of {start_url} finished: {} downloaded, {} failed",
            result.downloaded.len(),
            result.errors.len()
        );
        Ok(result)
    }

    /// Shuts both worker pools down.
    ///
    /// In-flight and already-queued tasks get a bounded grace period to
    /// finish, after which they are aborted; a pool that cannot be stopped is
    /// reported at warn level, never as an error. Idempotent.
    pub async fn close(&self) {
        self.download_pool.shutdown(SHUTDOWN_GRACE).await;
        self.extract_pool.shutdown(SHUTDOWN_GRACE).await;
        tracing::debug!("crawler closed");
    }
}

/// Download task: one URL, executed on the download pool.
///
/// Arrives at the barrier exactly once for its own unit in every branch. The
/// extraction it may spawn is registered *before* submission, so the barrier
/// can never observe a transient zero between this task finishing and the
/// extraction starting.
async fn download_page(
    url: String,
    follow_links: bool,
    downloader: Arc<dyn Downloader>,
    extract_pool: Arc<WorkerPool>,
    limiter: Arc<HostLimiter>,
    state: Arc<CrawlState>,
    barrier: Arc<LevelBarrier>,
) {
    let _permit = limiter.acquire(&url).await;

    match downloader.download(&url).await {
        Ok(document) => {
            state.record_downloaded(&url);
            if follow_links {
                barrier.register();
                let task = extract_page(
                    url.clone(),
                    document,
                    Arc::clone(&state),
                    Arc::clone(&barrier),
                );
                if !extract_pool.submit(task) {
                    // Shutdown race: give the unit back so the level barrier
                    // cannot hang on an extraction that will never run.
                    barrier.arrive();
                    tracing::warn!("extraction pool rejected {url}, links dropped");
                }
            }
        }
        Err(error) => {
            tracing::debug!("download of {url} failed: {error}");
            state.record_error(&url, error);
        }
    }

    barrier.arrive();
}

/// Extraction task: one downloaded document, executed on the extraction pool.
///
/// An extraction failure marks the URL errored but does not retract its
/// download; result assembly applies the error-wins precedence.
async fn extract_page(
    url: String,
    document: Box<dyn Document>,
    state: Arc<CrawlState>,
    barrier: Arc<LevelBarrier>,
) {
    match document.extract_links().await {
        Ok(links) => state.queue_links(links),
        Err(error) => {
            tracing::debug!("link extraction for {url} failed: {error}");
            state.record_error(&url, error);
        }
    }

    barrier.arrive();
}
