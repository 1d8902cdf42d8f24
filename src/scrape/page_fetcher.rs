//! Single-page scrape: one URL in, one [`Document`] out

use super::metadata::extract_metadata;
use super::normalizer::{is_usable, normalize_html};
use super::strategy::{RawContent, StrategyChain};
use crate::collab::BinaryExtractor;
use crate::config::{Config, PageOptions};
use crate::document::{Document, DocumentMetadata};
use crate::{HarvestError, Result};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Composes the strategy chain, the normalizer and metadata extraction
#[derive(Clone)]
pub struct PageFetcher {
    chain: StrategyChain,
    extractor: Arc<dyn BinaryExtractor>,
    min_content_length: usize,
}

/// Outcome of a successful fetch, before it becomes a document
struct Scraped {
    text: String,
    html: String,
}

impl PageFetcher {
    pub fn new(
        chain: StrategyChain,
        extractor: Arc<dyn BinaryExtractor>,
        min_content_length: usize,
    ) -> Self {
        Self {
            chain,
            extractor,
            min_content_length,
        }
    }

    /// Builds a fetcher whose chain follows the run configuration
    pub fn from_config(client: Client, config: &Config, extractor: Arc<dyn BinaryExtractor>) -> Self {
        let chain = StrategyChain::new(client, &config.fetch, &config.user_agent);
        Self::new(chain, extractor, config.fetch.min_content_length)
    }

    /// Scrapes one page into a document
    ///
    /// When `existing_html` meets the usable threshold it is normalized
    /// directly and no strategy is run. Otherwise strategies are tried in
    /// chain order until one yields usable normalized content.
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - Content, metadata, and raw HTML if `include_html` is set
    /// * `Err(HarvestError::ScrapeExhausted)` - No strategy produced usable content
    pub async fn scrape(
        &self,
        url: &str,
        options: &PageOptions,
        existing_html: Option<&str>,
    ) -> Result<Document> {
        let url = url.trim();

        let scraped = match existing_html.filter(|html| is_usable(html, self.min_content_length)) {
            Some(html) => {
                debug!("Reusing crawled HTML for {}", url);
                Scraped {
                    text: normalize_html(html, options.only_main_content),
                    html: html.to_string(),
                }
            }
            None => self.run_chain(url, options).await?,
        };

        if scraped.text.trim().is_empty() {
            return Err(HarvestError::ScrapeExhausted {
                url: url.to_string(),
            });
        }

        let metadata = if scraped.html.is_empty() {
            DocumentMetadata::for_source(url)
        } else {
            extract_metadata(&scraped.html, url)
        };

        Ok(Document {
            content: scraped.text.clone(),
            markdown: scraped.text,
            html: options.include_html.then_some(scraped.html),
            metadata,
            child_links: None,
        })
    }

    /// Scrapes one page, degrading any failure to an empty document
    pub async fn scrape_single_url(
        &self,
        url: &str,
        options: &PageOptions,
        existing_html: Option<&str>,
    ) -> Document {
        match self.scrape(url, options, existing_html).await {
            Ok(document) => document,
            Err(e) => {
                warn!("{}", e);
                Document::empty(url.trim())
            }
        }
    }

    /// Extracts a binary document (PDF, Word) through the extractor
    ///
    /// Extraction failures yield an empty document.
    pub async fn extract_binary(&self, url: &str) -> Document {
        match self.extractor.extract_text(url).await {
            Ok(text) => {
                let mut document = Document::empty(url);
                document.set_content(text);
                document
            }
            Err(e) => {
                warn!("{}", e);
                Document::empty(url)
            }
        }
    }

    async fn run_chain(&self, url: &str, options: &PageOptions) -> Result<Scraped> {
        let order = self.chain.order_for(url);

        for (i, strategy) in order.iter().enumerate() {
            debug!("Scraping {} with {}", url, strategy.kind());

            match self.chain.attempt(url, strategy).await {
                Ok(RawContent::Html(raw)) => {
                    let text = normalize_html(&raw, options.only_main_content);
                    if is_usable(&text, self.min_content_length) {
                        return Ok(Scraped { text, html: raw });
                    }
                    debug!(
                        "{} returned {} usable characters for {}",
                        strategy.kind(),
                        text.trim().chars().count(),
                        url
                    );
                }
                Ok(RawContent::Binary { content_type }) => {
                    debug!("Routing {} ({}) to the binary extractor", url, content_type);
                    match self.extractor.extract_text(url).await {
                        Ok(text) if !text.trim().is_empty() => {
                            return Ok(Scraped {
                                text,
                                html: String::new(),
                            });
                        }
                        Ok(_) => debug!("Binary extractor returned no text for {}", url),
                        Err(e) => warn!("{}", e),
                    }
                }
                Err(e) => warn!("{}", e),
            }

            if let Some(next) = order.get(i + 1) {
                info!("Falling back to {} for {}", next.kind(), url);
            }
        }

        Err(HarvestError::ScrapeExhausted {
            url: url.to_string(),
        })
    }
}
