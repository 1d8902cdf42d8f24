//! Document data model
//!
//! - [`CrawledPage`]: `{url, html}` pairs produced by the crawl frontier
//! - [`Document`]: the unit of output, normalized content plus source metadata
//! - [`DocumentMetadata`] and [`SitemapHints`]: page header fields and sitemap data

use serde::{Deserialize, Serialize};

/// A page discovered by the crawl frontier
///
/// `html` is empty when the URL was discovered but its content was never fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    pub html: String,
}

impl CrawledPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Change frequency, priority and last modification from a sitemap entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

/// Source metadata attached to every document
///
/// `source_url` is always the URL that was requested, never a redirect target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(flatten)]
    pub sitemap: Option<SitemapHints>,
}

impl DocumentMetadata {
    /// Metadata carrying only the source URL
    pub fn for_source(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }
}

/// A harvested page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Normalized Markdown text
    pub content: String,
    /// Same as `content` on emission
    pub markdown: String,
    /// Raw HTML, only when requested through page options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    pub metadata: DocumentMetadata,
    /// Links discovered on the page; pipeline bookkeeping, stripped before emission
    #[serde(skip)]
    pub child_links: Option<Vec<String>>,
}

impl Document {
    /// The empty-content document produced when a page could not be scraped
    pub fn empty(source_url: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            markdown: String::new(),
            html: Some(String::new()),
            metadata: DocumentMetadata::for_source(source_url),
            child_links: None,
        }
    }

    /// A metadata-only document used when the caller asked for URLs only
    pub fn url_only(source_url: impl Into<String>) -> Self {
        Self {
            html: None,
            ..Self::empty(source_url)
        }
    }

    pub fn source_url(&self) -> &str {
        &self.metadata.source_url
    }

    /// Sets `content` and keeps `markdown` in sync with it
    pub fn set_content(&mut self, content: String) {
        self.markdown = content.clone();
        self.content = content;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_keeps_source() {
        let doc = Document::empty("https://example.gov/a");
        assert_eq!(doc.content, "");
        assert_eq!(doc.markdown, "");
        assert_eq!(doc.html.as_deref(), Some(""));
        assert_eq!(doc.source_url(), "https://example.gov/a");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_set_content_syncs_markdown() {
        let mut doc = Document::empty("https://example.gov/a");
        doc.set_content("# Grants".to_string());
        assert_eq!(doc.content, doc.markdown);
    }

    #[test]
    fn test_serialized_metadata_names() {
        let mut doc = Document::url_only("https://example.gov/a");
        doc.metadata.og_title = Some("Grants".to_string());
        doc.metadata.sitemap = Some(SitemapHints {
            changefreq: Some("weekly".to_string()),
            priority: Some(0.5),
            lastmod: None,
        });
        doc.child_links = Some(vec!["https://example.gov/b".to_string()]);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["metadata"]["sourceURL"], "https://example.gov/a");
        assert_eq!(json["metadata"]["ogTitle"], "Grants");
        assert_eq!(json["metadata"]["changefreq"], "weekly");
        assert!(json.get("childLinks").is_none());
        assert!(json.get("child_links").is_none());
        assert!(json.get("html").is_none());
    }
}
