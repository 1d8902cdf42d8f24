//! Sumi-Harvest: a polite site harvester
//!
//! This crate crawls a target site from a set of seed URLs, respecting robots.txt,
//! fetches every discovered page through an ordered chain of fetch strategies,
//! strips non-content markup, converts the remainder to Markdown and emits a
//! bounded, deduplicated list of documents with source metadata.

pub mod collab;
pub mod config;
pub mod crawler;
pub mod document;
pub mod output;
pub mod pipeline;
pub mod robots;
pub mod scrape;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("{strategy} fetch failed for {url}: {reason}")]
    FetchFailed {
        url: String,
        strategy: String,
        reason: String,
    },

    #[error("All fetch strategies failed for {url}")]
    ScrapeExhausted { url: String },

    #[error("Text extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid path pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use document::{CrawledPage, Document, DocumentMetadata};
pub use pipeline::{DocumentPipeline, Progress, ProgressStatus};
