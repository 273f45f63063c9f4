//! HTTP implementations of the fetch capabilities
//!
//! The downloader issues one GET per URL and classifies failures into the
//! recoverable per-page error taxonomy; non-success statuses are failures,
//! not content. Redirects are followed by the client, and links are resolved
//! against the post-redirect URL.

use crate::fetch::parser::collect_links;
use crate::fetch::{Document, Downloader};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("wavecrawl/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`Downloader`].
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Builds a downloader with the crate's user agent and fixed timeouts.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str) -> Result<Box<dyn Document>, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let base = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;

        Ok(Box::new(HtmlPage::new(base, body)))
    }
}

/// A fetched HTML page; [`Document`] over scraper.
pub struct HtmlPage {
    base: Url,
    body: String,
}

impl HtmlPage {
    pub fn new(base: Url, body: String) -> Self {
        Self { base, body }
    }
}

#[async_trait]
impl Document for HtmlPage {
    async fn extract_links(&self) -> Result<Vec<String>, FetchError> {
        Ok(collect_links(&self.body, &self.base))
    }
}
