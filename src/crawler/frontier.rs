//! Crawl frontier: breadth-first link discovery
//!
//! The frontier walks the site one depth layer at a time. Each layer is a
//! list of `(url, remaining depth)` tasks processed by a bounded pool of
//! concurrent fetches; the next layer is only built once the current one
//! has drained. State transitions per run:
//!
//! - Init: the politeness policy is loaded by the caller
//! - Expanding: the current layer is dispatched
//! - Draining: in-flight fetches of the layer complete
//! - Done: depth budget spent, link cap reached, or no new links
//!
//! The visited set and the result list are the only shared state. They sit
//! behind a mutex that is never held across an await point.

use super::fetcher::{fetch_page, FetchResult};
use super::parser::extract_links;
use crate::config::{CrawlConfig, PageOptions};
use crate::document::CrawledPage;
use crate::pipeline::{Progress, ProgressFn};
use crate::robots::PolitenessPolicy;
use crate::scrape::PageFetcher;
use crate::url::{canonicalize, is_file, is_social_or_email, origin_of, LinkFilter};
use futures::stream::{self, StreamExt};
use rand::Rng;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Links recorded by the frontier, first write wins
#[derive(Debug, Default)]
struct CrawlState {
    visited: HashSet<String>,
    results: Vec<CrawledPage>,
    index: HashMap<String, usize>,
}

impl CrawlState {
    /// Records a page; an existing entry only gains HTML if it had none
    fn record(&mut self, url: &str, html: &str, cap: usize) -> bool {
        if let Some(&i) = self.index.get(url) {
            if self.results[i].html.is_empty() && !html.is_empty() {
                self.results[i].html = html.to_string();
            }
            return false;
        }

        if self.results.len() >= cap {
            return false;
        }

        self.index.insert(url.to_string(), self.results.len());
        self.results.push(CrawledPage::new(url, html));
        true
    }
}

/// Breadth-first crawl orchestrator for one run
pub struct Frontier {
    client: Client,
    fetcher: PageFetcher,
    filter: LinkFilter,
    policy: PolitenessPolicy,
    scraped_by: String,
    concurrency: usize,
    max_depth: usize,
    max_total_links: usize,
    jitter_ms: u64,
    state: Mutex<CrawlState>,
}

impl Frontier {
    /// Creates a frontier for one run
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client for direct page fetches
    /// * `fetcher` - Page fetcher used for the first page of the run
    /// * `filter` - Compiled link filter
    /// * `policy` - Politeness policy loaded for the seed origin
    /// * `crawl` - Crawl limits
    /// * `scraped_by` - Value of the `X-Scraped-By` header
    pub fn new(
        client: Client,
        fetcher: PageFetcher,
        filter: LinkFilter,
        policy: PolitenessPolicy,
        crawl: &CrawlConfig,
        scraped_by: &str,
    ) -> Self {
        Self {
            client,
            fetcher,
            filter,
            policy,
            scraped_by: scraped_by.to_string(),
            concurrency: crawl.concurrency.max(1),
            max_depth: crawl.max_depth,
            max_total_links: crawl.max_total_links,
            jitter_ms: crawl.jitter_ms,
            state: Mutex::new(CrawlState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// Every recorded `{url, html}` pair in discovery order. When nothing was
    /// recorded but the first seed passes the link filter, a single
    /// placeholder for that seed is returned instead.
    pub async fn run(&self, progress: Option<&ProgressFn>) -> Vec<CrawledPage> {
        let mut layer: Vec<String> = self
            .filter
            .seeds()
            .iter()
            .filter(|seed| self.policy.is_allowed(seed))
            .cloned()
            .collect();
        let mut remaining = self.max_depth;

        info!(
            "Crawling from {} seeds (depth {}, cap {})",
            layer.len(),
            self.max_depth,
            self.max_total_links
        );

        while !layer.is_empty() && remaining > 0 {
            if self.state().results.len() >= self.max_total_links {
                info!("Link cap of {} reached", self.max_total_links);
                break;
            }

            debug!("Expanding layer of {} urls ({} layers left)", layer.len(), remaining);

            let discovered: Vec<Vec<String>> = stream::iter(layer)
                .map(|url| self.visit(url, remaining, progress))
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            let mut seen = HashSet::new();
            let state = self.state();
            layer = discovered
                .into_iter()
                .flatten()
                .filter(|url| !state.visited.contains(url) && seen.insert(url.clone()))
                .collect();
            drop(state);

            remaining -= 1;
        }

        let results = std::mem::take(&mut self.state().results);
        info!("Crawl finished with {} links", results.len());

        if results.is_empty() {
            if let Some(seed) = self.filter.seeds().first() {
                if self.filter.admit(seed, true, &self.policy) {
                    return vec![CrawledPage::new(seed.clone(), "")];
                }
            }
        }

        results
    }

    /// Processes one task and returns the newly discovered links
    async fn visit(
        &self,
        url: String,
        remaining: usize,
        progress: Option<&ProgressFn>,
    ) -> Vec<String> {
        if remaining == 0 || self.state().results.len() >= self.max_total_links {
            return Vec::new();
        }

        if self.jitter_ms > 0 {
            let delay = rand::rng().random_range(0..=self.jitter_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let first = {
            let mut state = self.state();
            if !state.visited.insert(url.clone()) {
                return Vec::new();
            }
            state.visited.len() == 1
        };

        if !self.policy.is_allowed(&url) || is_file(&url) || is_social_or_email(&url) {
            return Vec::new();
        }

        let html = self.fetch_html(&url, first).await;
        let links = self.admitted_links(&url, &html);

        info!("Crawling: {}, layers remaining: {}", url, remaining);

        let new_links: Vec<String> = {
            let mut state = self.state();
            state.record(&url, &html, self.max_total_links);
            links
                .into_iter()
                .filter(|link| {
                    state.record(link, "", self.max_total_links);
                    !state.visited.contains(link)
                })
                .collect()
        };

        debug!("Found {} new links on {}", new_links.len(), url);

        if let Some(report) = progress {
            let current = self.state().results.len();
            let current_url = new_links.last().cloned().unwrap_or_else(|| url.clone());
            report(&Progress::scraping(current, self.max_total_links, current_url));
        }

        new_links
    }

    /// Fetches page HTML; the first page of a run goes through the page fetcher
    async fn fetch_html(&self, url: &str, first: bool) -> String {
        if first {
            let options = PageOptions {
                only_main_content: false,
                include_html: true,
            };
            let html = self
                .fetcher
                .scrape_single_url(url, &options, None)
                .await
                .html
                .unwrap_or_default();
            if !html.is_empty() {
                return html;
            }
        }

        match fetch_page(&self.client, url, &self.scraped_by).await {
            FetchResult::Success {
                status_code,
                content_type,
                body,
            } => {
                debug!("Fetched {} ({} {}, {} bytes)", url, status_code, content_type, body.len());
                body
            }
            FetchResult::ContentMismatch { content_type } => {
                debug!("Skipping links of {}: content type {}", url, content_type);
                String::new()
            }
            FetchResult::HttpError { status_code } => {
                debug!("Skipping links of {}: HTTP {}", url, status_code);
                String::new()
            }
            FetchResult::NetworkError { error } => {
                debug!("Skipping links of {}: {}", url, error);
                String::new()
            }
        }
    }

    fn admitted_links(&self, page_url: &str, html: &str) -> Vec<String> {
        if html.is_empty() {
            return Vec::new();
        }

        let Ok(parsed) = Url::parse(page_url) else {
            return Vec::new();
        };
        let origin = origin_of(&parsed);

        let mut seen = HashSet::new();
        extract_links(html, &origin)
            .into_iter()
            .filter(|link| self.filter.admit(link, false, &self.policy))
            .filter_map(|link| canonicalize(&link).ok())
            .filter(|link| link != page_url && seen.insert(link.clone()))
            .collect()
    }
}
