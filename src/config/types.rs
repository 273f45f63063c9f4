/// Crawler construction configuration
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Number of workers in the download pool
    pub download_workers: usize,

    /// Number of workers in the link-extraction pool
    pub extract_workers: usize,

    /// Maximum concurrent downloads against a single host
    pub per_host: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            download_workers: 1,
            extract_workers: 1,
            per_host: 1,
        }
    }
}
