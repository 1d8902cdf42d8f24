//! Document pipeline: one full harvest run
//!
//! The pipeline drives a run from configuration to emitted documents:
//! 1. Discover pages (seed URLs directly, or through the crawl frontier)
//! 2. Optionally stop early with URL-only documents
//! 3. Scrape pages in bounded batches, reusing crawled HTML in fast mode
//! 4. Attach sitemap hints and rewrite relative paths
//! 5. De-duplicate, truncate and strip bookkeeping fields

mod paths;
mod progress;
mod sitemap;

pub use paths::rewrite_paths;
pub use progress::{Progress, ProgressFn, ProgressStatus};
pub use sitemap::SitemapIndex;

use crate::collab::{
    cache_key, is_binary_document, BinaryExtractor, DocumentCache, NoopCache,
    UnsupportedExtractor,
};
use crate::config::{validate, Config, CrawlMode, CrawlerMode};
use crate::crawler::{build_http_client, extract_links, Frontier};
use crate::document::{CrawledPage, Document};
use crate::robots::PolitenessPolicy;
use crate::scrape::PageFetcher;
use crate::url::{origin_of, LinkFilter};
use crate::Result;
use futures::future::join_all;
use rand::Rng;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Top-level orchestrator for one harvest run
pub struct DocumentPipeline {
    config: Config,
    client: Client,
    fetcher: PageFetcher,
    cache: Arc<dyn DocumentCache>,
    progress: Option<Arc<ProgressFn>>,
}

impl DocumentPipeline {
    /// Creates a pipeline after validating the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentPipeline)` - Ready to run
    /// * `Err(HarvestError::Config)` - Invalid configuration; no fetch has happened
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;

        let client = build_http_client(&config.user_agent, &config.fetch)?;
        let fetcher =
            PageFetcher::from_config(client.clone(), &config, Arc::new(UnsupportedExtractor));

        Ok(Self {
            config,
            client,
            fetcher,
            cache: Arc::new(NoopCache),
            progress: None,
        })
    }

    /// Replaces the binary document extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn BinaryExtractor>) -> Self {
        self.fetcher = PageFetcher::from_config(self.client.clone(), &self.config, extractor);
        self
    }

    /// Replaces the document cache
    pub fn with_cache(mut self, cache: Arc<dyn DocumentCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Registers a progress callback
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        let callback: Arc<ProgressFn> = Arc::new(callback);
        self.progress = Some(callback);
        self
    }

    /// Runs the harvest
    ///
    /// Individual page failures never abort the run; they surface as
    /// empty-content documents.
    ///
    /// # Returns
    ///
    /// At most `max-total-links` documents, in discovery order
    pub async fn run(&self) -> Result<Vec<Document>> {
        let crawl = &self.config.crawl;

        let pages = match crawl.mode {
            CrawlMode::SingleUrls => crawl
                .seed_urls()
                .into_iter()
                .map(|url| CrawledPage::new(url, ""))
                .collect(),
            CrawlMode::Crawl => self.crawl().await?,
        };

        info!("Harvest run has {} candidate urls", pages.len());

        if crawl.return_only_urls {
            let documents: Vec<Document> = pages
                .into_iter()
                .take(crawl.max_total_links)
                .map(|page| Document::url_only(page.url))
                .collect();
            self.report(&Progress {
                current: documents.len(),
                total: documents.len(),
                status: ProgressStatus::Completed,
                current_document_url: None,
                current_document: None,
            });
            return Ok(documents);
        }

        let mut documents = self.process_links(pages).await;

        if crawl.sitemap_hints {
            self.attach_sitemap_hints(&mut documents).await;
        }

        for document in &mut documents {
            rewrite_paths(document, crawl.replace_all_paths);
        }

        Ok(self.finalize(documents))
    }

    async fn crawl(&self) -> Result<Vec<CrawledPage>> {
        let filter = LinkFilter::new(&self.config.crawl)?;
        let Some(first_seed) = filter.seeds().first() else {
            return Ok(Vec::new());
        };
        let origin = origin_of(&Url::parse(first_seed)?);

        let policy =
            PolitenessPolicy::load(&self.client, &origin, &self.config.user_agent.crawler_name)
                .await;

        let frontier = Frontier::new(
            self.client.clone(),
            self.fetcher.clone(),
            filter,
            policy,
            &self.config.crawl,
            &self.config.user_agent.scraped_by,
        );

        Ok(frontier.run(self.progress.as_deref()).await)
    }

    /// Scrapes pages in batches of `concurrency`, preserving input order
    async fn process_links(&self, pages: Vec<CrawledPage>) -> Vec<Document> {
        let total = pages.len();
        let width = self.config.crawl.concurrency.max(1);
        let mut documents = Vec::with_capacity(total);

        for batch in pages.chunks(width) {
            let converted = join_all(batch.iter().map(|page| self.convert(page))).await;

            for document in converted {
                self.report(&Progress {
                    current: documents.len() + 1,
                    total,
                    status: ProgressStatus::Scraping,
                    current_document_url: Some(document.source_url().to_string()),
                    current_document: Some(document.clone()),
                });
                documents.push(document);
            }
        }

        documents
    }

    /// Turns one crawled page into a document, consulting the cache first
    async fn convert(&self, page: &CrawledPage) -> Document {
        if is_binary_document(&page.url) {
            debug!("Routing {} to the binary extractor", page.url);
            return self.fetcher.extract_binary(&page.url).await;
        }

        let key = cache_key(&page.url);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Cache hit for {}", page.url);
            return cached;
        }

        let jitter_ms = self.config.crawl.jitter_ms;
        if jitter_ms > 0 {
            let delay = rand::rng().random_range(0..=jitter_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let existing = (self.config.crawl.crawler_mode == CrawlerMode::Fast
            && !page.html.is_empty())
        .then_some(page.html.as_str());

        let mut document = self
            .fetcher
            .scrape_single_url(&page.url, &self.config.page, existing)
            .await;

        if !document.is_empty() {
            if !page.html.is_empty() {
                document.child_links = Url::parse(&page.url)
                    .ok()
                    .map(|url| extract_links(&page.html, &origin_of(&url)));
            }
            self.cache.set(&key, &document).await;
        }

        document
    }

    async fn attach_sitemap_hints(&self, documents: &mut [Document]) {
        let Some(origin) = self
            .config
            .crawl
            .seed_urls()
            .first()
            .and_then(|seed| Url::parse(seed).ok())
            .map(|seed| origin_of(&seed))
        else {
            return;
        };

        let index =
            SitemapIndex::load(&self.client, &origin, &self.config.user_agent.scraped_by).await;
        if index.is_empty() {
            return;
        }

        for document in documents.iter_mut() {
            if let Some(hints) = index.hints_for(document.source_url()) {
                document.metadata.sitemap = Some(hints.clone());
            }
        }
    }

    fn finalize(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut seen = HashSet::new();
        let documents: Vec<Document> = documents
            .into_iter()
            .filter(|document| seen.insert(document.source_url().to_string()))
            .take(self.config.crawl.max_total_links)
            .map(|mut document| {
                document.child_links = None;
                document
            })
            .collect();

        info!("Harvest run produced {} documents", documents.len());
        documents
    }

    fn report(&self, progress: &Progress) {
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }
}
