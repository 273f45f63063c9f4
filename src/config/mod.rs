//! Configuration module for Wavecrawl
//!
//! Pool sizes and the per-host cap are fixed at crawler construction and
//! validated before any worker is spawned.

mod types;
mod validation;

// Re-export types
pub use types::CrawlerConfig;

// Re-export validation
pub use validation::validate;
