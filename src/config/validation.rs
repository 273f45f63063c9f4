use crate::config::types::CrawlerConfig;
use crate::ConfigError;

/// Validates the crawler configuration
pub fn validate(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.download_workers < 1 {
        return Err(ConfigError::Validation(format!(
            "download_workers must be at least 1, got {}",
            config.download_workers
        )));
    }

    if config.extract_workers < 1 {
        return Err(ConfigError::Validation(format!(
            "extract_workers must be at least 1, got {}",
            config.extract_workers
        )));
    }

    if config.per_host < 1 {
        return Err(ConfigError::Validation(format!(
            "per_host must be at least 1, got {}",
            config.per_host
        )));
    }

    Ok(())
}
