//! Anchor extraction for link discovery
//!
//! Relative hrefs are resolved against the site origin, not the page URL.
//! Hrefs that cannot be resolved are skipped without affecting the rest of
//! the page.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Extracts all followable links from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Hrefs that fail to resolve, or resolve to non-HTTP(S) URLs
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `origin` - The site origin used to resolve relative links
///
/// # Returns
///
/// Absolute URLs in document order; duplicates are kept.
///
/// # Example
///
/// ```
/// use sumi_harvest::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<body><a href="/grants">Grants</a></body>"#;
/// let origin = Url::parse("https://example.gov/").unwrap();
/// assert_eq!(extract_links(html, &origin), vec!["https://example.gov/grants"]);
/// ```
pub fn extract_links(html: &str, origin: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            match resolve_link(href, origin) {
                Some(absolute_url) => links.push(absolute_url),
                None => debug!("Skipping unresolvable href '{}'", href),
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, origin: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let resolved = if lower.starts_with("http") {
        Url::parse(href)
    } else {
        origin.join(href)
    };

    match resolved {
        Ok(absolute_url)
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" =>
        {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
