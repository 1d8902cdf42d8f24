//! Sitemap hints: changefreq, priority and lastmod per URL

use crate::crawler::fetch_page;
use crate::document::SitemapHints;
use crate::url::site_host;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Sitemap entries keyed by host (without `www.`) and path
#[derive(Debug, Default)]
pub struct SitemapIndex {
    entries: HashMap<String, SitemapHints>,
}

impl SitemapIndex {
    /// Fetches and parses `{origin}/sitemap.xml`
    ///
    /// A missing or unreadable sitemap yields an empty index.
    pub async fn load(client: &Client, origin: &Url, scraped_by: &str) -> Self {
        let Ok(sitemap_url) = origin.join("/sitemap.xml") else {
            return Self::default();
        };

        let body = fetch_page(client, sitemap_url.as_str(), scraped_by)
            .await
            .into_body();
        if body.is_empty() {
            warn!("No sitemap available at {}", sitemap_url);
            return Self::default();
        }

        let index = Self::parse(&body);
        debug!("Loaded {} sitemap entries from {}", index.len(), sitemap_url);
        index
    }

    /// Parses `<url>` entries from sitemap XML
    pub fn parse(xml: &str) -> Self {
        let document = Html::parse_document(xml);
        let (Ok(url_sel), Ok(loc_sel)) = (Selector::parse("url"), Selector::parse("loc")) else {
            return Self::default();
        };

        let mut entries = HashMap::new();
        for entry in document.select(&url_sel) {
            let Some(key) = child_text(&entry, &loc_sel).and_then(|loc| match_key(&loc)) else {
                continue;
            };

            let hints = SitemapHints {
                changefreq: child_text_of(&entry, "changefreq"),
                priority: child_text_of(&entry, "priority").and_then(|p| p.parse().ok()),
                lastmod: child_text_of(&entry, "lastmod"),
            };
            entries.entry(key).or_insert(hints);
        }

        Self { entries }
    }

    /// Hints for a document source URL, ignoring `www.` and a trailing slash
    pub fn hints_for(&self, url: &str) -> Option<&SitemapHints> {
        self.entries.get(&match_key(url)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn match_key(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = site_host(&url)?;
    Some(format!("{}{}", host, url.path().trim_end_matches('/')))
}

fn child_text(entry: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    entry
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn child_text_of(entry: &ElementRef<'_>, name: &str) -> Option<String> {
    let selector = Selector::parse(name).ok()?;
    child_text(entry, &selector)
}
