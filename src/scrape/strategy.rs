//! Fetch strategy chain
//!
//! The chain is a closed set of strategies built once per run from
//! configuration. Strategies whose endpoint is not configured are left out
//! of the chain entirely. A per-host override may promote one strategy to
//! the front and supply a render wait.

use crate::collab::is_binary_content_type;
use crate::config::{FetchConfig, HostOverride, StrategyKind, UserAgentConfig};
use crate::crawler::SCRAPED_BY_HEADER;
use crate::url::strip_www;
use crate::{HarvestError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Order used when no host override applies
const DEFAULT_ORDER: &[StrategyKind] = &[StrategyKind::RenderService, StrategyKind::Http];

/// Raw content returned by one strategy attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// HTML or other text to be normalized
    Html(String),
    /// A binary document that must go through the extractor
    Binary { content_type: String },
}

/// One way of obtaining a page's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Headless rendering service: `POST {endpoint}/scrape`
    RenderService { endpoint: String },
    /// Plain HTTP GET
    Http,
}

impl FetchStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::RenderService { .. } => StrategyKind::RenderService,
            Self::Http => StrategyKind::Http,
        }
    }
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
    wait: u64,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Ordered set of available fetch strategies for one run
#[derive(Debug, Clone)]
pub struct StrategyChain {
    client: Client,
    strategies: Vec<FetchStrategy>,
    overrides: HashMap<String, HostOverride>,
    scraped_by: String,
}

impl StrategyChain {
    /// Builds the chain from configuration
    ///
    /// The render service is only part of the chain when its URL is configured.
    pub fn new(client: Client, fetch: &FetchConfig, user_agent: &UserAgentConfig) -> Self {
        let mut strategies = Vec::new();

        if let Some(endpoint) = fetch
            .render_service_url
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            strategies.push(FetchStrategy::RenderService {
                endpoint: endpoint.trim_end_matches('/').to_string(),
            });
        }
        strategies.push(FetchStrategy::Http);

        let overrides = fetch
            .host_overrides
            .iter()
            .map(|o| (strip_www(&o.host.trim().to_lowercase()).to_string(), o.clone()))
            .collect();

        Self {
            client,
            strategies,
            overrides,
            scraped_by: user_agent.scraped_by.clone(),
        }
    }

    /// Kinds of the strategies present in this chain
    pub fn available(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(FetchStrategy::kind).collect()
    }

    fn strategy(&self, kind: StrategyKind) -> Option<&FetchStrategy> {
        self.strategies.iter().find(|s| s.kind() == kind)
    }

    fn host_override(&self, url: &str) -> Option<&HostOverride> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        self.overrides.get(strip_www(&host))
    }

    /// Strategies to try for `url`, in order
    ///
    /// The order is the host override (if any), then the default order, then
    /// any remaining available strategy, each at most once and only if available.
    pub fn order_for(&self, url: &str) -> Vec<&FetchStrategy> {
        let promoted = self.host_override(url).and_then(|o| o.strategy);

        let mut order: Vec<&FetchStrategy> = Vec::new();
        let candidates = promoted
            .into_iter()
            .chain(DEFAULT_ORDER.iter().copied())
            .chain(self.available());

        for kind in candidates {
            if let Some(strategy) = self.strategy(kind) {
                if !order.iter().any(|s| s.kind() == kind) {
                    order.push(strategy);
                }
            }
        }

        order
    }

    /// Render wait for `url` from its host override (milliseconds)
    pub fn wait_for(&self, url: &str) -> u64 {
        self.host_override(url).map(|o| o.wait_ms).unwrap_or(0)
    }

    /// Runs one strategy against `url`
    ///
    /// # Returns
    ///
    /// * `Ok(RawContent)` - Text to normalize, or a binary document marker
    /// * `Err(HarvestError::FetchFailed)` - The strategy failed; try the next one
    pub async fn attempt(&self, url: &str, strategy: &FetchStrategy) -> Result<RawContent> {
        match strategy {
            FetchStrategy::RenderService { endpoint } => {
                self.fetch_rendered(url, endpoint).await
            }
            FetchStrategy::Http => self.fetch_http(url).await,
        }
    }

    async fn fetch_rendered(&self, url: &str, endpoint: &str) -> Result<RawContent> {
        let failed = |reason: String| HarvestError::FetchFailed {
            url: url.to_string(),
            strategy: StrategyKind::RenderService.to_string(),
            reason,
        };

        let request = RenderRequest {
            url,
            wait: self.wait_for(url),
        };
        debug!("Rendering {} via {} (wait {}ms)", url, endpoint, request.wait);

        let response = self
            .client
            .post(format!("{}/scrape", endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())));
        }

        let content_type = content_type_of(&response);
        if is_binary_content_type(&content_type) {
            return Ok(RawContent::Binary { content_type });
        }

        let body: RenderResponse = response.json().await.map_err(|e| failed(e.to_string()))?;
        Ok(RawContent::Html(body.content.unwrap_or_default()))
    }

    async fn fetch_http(&self, url: &str) -> Result<RawContent> {
        let failed = |reason: String| HarvestError::FetchFailed {
            url: url.to_string(),
            strategy: StrategyKind::Http.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header(SCRAPED_BY_HEADER, &self.scraped_by)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())));
        }

        let content_type = content_type_of(&response);
        if is_binary_content_type(&content_type) {
            return Ok(RawContent::Binary { content_type });
        }

        let body = response.text().await.map_err(|e| failed(e.to_string()))?;
        Ok(RawContent::Html(body))
    }
}

fn content_type_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
