//! Per-host download concurrency cap
//!
//! One semaphore per host, created lazily the first time a host is seen.
//! Download tasks hold a permit for their URL's host while the downloader
//! runs, so at most `per_host` requests hit a single host at once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

pub struct HostLimiter {
    per_host: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostLimiter {
    pub fn new(per_host: usize) -> Self {
        Self {
            per_host,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires a permit for the host of `url`.
    ///
    /// URLs that do not parse as absolute URLs carry no host and are not
    /// gated; crawl URLs are opaque strings and stay un-normalized either
    /// way.
    pub async fn acquire(&self, url: &str) -> Option<OwnedSemaphorePermit> {
        let host = Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))?;

        let semaphore = {
            let mut hosts = self.hosts.lock().unwrap();
            Arc::clone(
                hosts
                    .entry(host)
                    .or_insert_with(|| Arc::new(Semaphore::new(self.per_host))),
            )
        };

        semaphore.acquire_owned().await.ok()
    }
}
