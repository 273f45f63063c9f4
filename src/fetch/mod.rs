//! Fetch capabilities consumed by the crawl core
//!
//! The orchestrator only knows the two traits below; the production
//! implementations ([`HttpDownloader`] over reqwest, [`HtmlPage`] over
//! scraper) live in this module, and tests substitute scripted doubles.

mod http;
mod parser;

pub use http::{HttpDownloader, HtmlPage};
pub use parser::collect_links;

use crate::FetchError;
use async_trait::async_trait;

/// Turns a URL into a downloaded [`Document`].
///
/// Implementations may block for arbitrary time and fail with a recoverable
/// [`FetchError`]; the crawl core converts failures into error-map entries.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<Box<dyn Document>, FetchError>;
}

/// A downloaded page that can report the URLs found on it.
#[async_trait]
pub trait Document: Send {
    async fn extract_links(&self) -> Result<Vec<String>, FetchError>;
}
