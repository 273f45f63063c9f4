//! Shared bookkeeping for one crawl call
//!
//! One `CrawlState` is created per `download` call and dropped when the
//! result is returned; nothing leaks across calls, and concurrent calls on
//! the same crawler each get their own state. Every structure sits behind its
//! own mutex because each mutation is a single independent operation;
//! workers never need a consistent snapshot of more than one of them.

use crate::{ErrorMap, FetchError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Final output of one crawl call.
#[derive(Debug)]
pub struct CrawlResult {
    /// URLs downloaded successfully, with errored URLs excluded. Sorted.
    pub downloaded: Vec<String>,

    /// URL to the error that failed it, at either stage.
    pub errors: ErrorMap,
}

pub(crate) struct CrawlState {
    visited: Mutex<HashSet<String>>,
    downloaded: Mutex<HashSet<String>>,
    errors: Mutex<ErrorMap>,
    discovered: Mutex<Vec<String>>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            visited: Mutex::new(HashSet::new()),
            downloaded: Mutex::new(HashSet::new()),
            errors: Mutex::new(HashMap::new()),
            discovered: Mutex::new(Vec::new()),
        }
    }

    /// Insert-if-absent dedup gate. Only the caller that gets `true` may
    /// schedule the URL for download.
    pub fn mark_visited(&self, url: &str) -> bool {
        self.visited.lock().unwrap().insert(url.to_string())
    }

    pub fn record_downloaded(&self, url: &str) {
        self.downloaded.lock().unwrap().insert(url.to_string());
    }

    pub fn record_error(&self, url: &str, error: FetchError) {
        self.errors.lock().unwrap().insert(url.to_string(), error);
    }

    /// Appends links found by one extraction task to the next-level frontier.
    pub fn queue_links(&self, links: Vec<String>) {
        self.discovered.lock().unwrap().extend(links);
    }

    /// Takes the accumulated next-level frontier, leaving it empty.
    pub fn take_discovered(&self) -> Vec<String> {
        std::mem::take(&mut *self.discovered.lock().unwrap())
    }

    /// Assembles the final result. Errored URLs are dropped from the
    /// downloaded list even when their download itself succeeded.
    pub fn finish(&self) -> CrawlResult {
        let errors = std::mem::take(&mut *self.errors.lock().unwrap());
        let downloaded = std::mem::take(&mut *self.downloaded.lock().unwrap());

        let mut list: Vec<String> = downloaded
            .into_iter()
            .filter(|url| !errors.contains_key(url))
            .collect();
        list.sort();

        CrawlResult {
            downloaded: list,
            errors,
        }
    }
}
