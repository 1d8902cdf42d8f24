use crate::config::types::{Config, CrawlConfig, FetchConfig, UserAgentConfig};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates the crawl section: seeds, limits and path patterns
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.seeds.iter().all(|seed| seed.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in config.seed_urls() {
        let url = Url::parse(&seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed
            )));
        }
    }

    if config.concurrency < 1 || config.concurrency > 256 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 256, got {}",
            config.concurrency
        )));
    }

    if config.max_total_links < 1 {
        return Err(ConfigError::Validation(
            "max_total_links must be >= 1".to_string(),
        ));
    }

    validate_patterns("includes", &config.includes)?;
    validate_patterns("excludes", &config.excludes)?;

    Ok(())
}

/// Validates that every non-empty pattern compiles as a regular expression
fn validate_patterns(field: &str, patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns.iter().filter(|p| !p.is_empty()) {
        Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("{} pattern '{}': {}", field, pattern, e))
        })?;
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates the fetch strategy section
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if let Some(endpoint) = &config.render_service_url {
        Url::parse(endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid render_service_url '{}': {}", endpoint, e))
        })?;
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    for entry in &config.host_overrides {
        if entry.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "host override with an empty host".to_string(),
            ));
        }
    }

    Ok(())
}
