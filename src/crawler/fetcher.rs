//! HTTP fetcher implementation
//!
//! This module handles the direct page fetches used for link discovery:
//! - Building the shared HTTP client with the crawler's user agent
//! - GET requests carrying the `X-Scraped-By` header
//! - Classifying the outcome so callers can degrade to "no links"

use crate::config::{FetchConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Header identifying harvest traffic to site operators
pub const SCRAPED_BY_HEADER: &str = "X-Scraped-By";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched a text page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (may be empty)
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Response is not a text page (image, PDF, archive...)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Body of a successful fetch, empty for every other outcome
    pub fn into_body(self) -> String {
        match self {
            Self::Success { body, .. } => body,
            _ => String::new(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetch` - Fetch configuration supplying the request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::config::{FetchConfig, UserAgentConfig};
/// use sumi_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format_user_agent(user_agent))
        .timeout(Duration::from_secs(fetch.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent string: `CrawlerName/Version (+ContactURL)`
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Fetches a page for link discovery
///
/// No retries: a failed fetch yields a non-success [`FetchResult`] and the
/// caller treats the page as having no links.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `scraped_by` - Value of the `X-Scraped-By` header
pub async fn fetch_page(client: &Client, url: &str, scraped_by: &str) -> FetchResult {
    let response = match client
        .get(url)
        .header(SCRAPED_BY_HEADER, scraped_by)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_text_content(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Returns true for responses that may contain HTML
///
/// A missing Content-Type is treated as text.
pub fn is_text_content(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("html")
        || content_type.starts_with("text/")
        || content_type.contains("xml")
}
