//! Page metadata extraction from raw HTML headers

use crate::document::DocumentMetadata;
use scraper::{Html, Selector};

/// Extracts title, description, Open Graph and similar header fields
///
/// `source_url` is recorded as given; redirects never change it.
pub fn extract_metadata(html: &str, source_url: &str) -> DocumentMetadata {
    let document = Html::parse_document(html);

    DocumentMetadata {
        source_url: source_url.to_string(),
        title: select_text(&document, "title"),
        description: meta_content(&document, r#"meta[name="description"]"#),
        language: select_attr(&document, "html[lang]", "lang"),
        keywords: meta_content(&document, r#"meta[name="keywords"]"#),
        robots: meta_content(&document, r#"meta[name="robots"]"#),
        author: meta_content(&document, r#"meta[name="author"]"#),
        canonical: select_attr(&document, r#"link[rel="canonical"]"#, "href"),
        og_title: meta_content(&document, r#"meta[property="og:title"]"#),
        og_description: meta_content(&document, r#"meta[property="og:description"]"#),
        og_url: meta_content(&document, r#"meta[property="og:url"]"#),
        og_image: meta_content(&document, r#"meta[property="og:image"]"#),
        og_site_name: meta_content(&document, r#"meta[property="og:site_name"]"#),
        og_locale: meta_content(&document, r#"meta[property="og:locale"]"#),
        published_time: meta_content(&document, r#"meta[property="article:published_time"]"#),
        sitemap: None,
    }
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    select_attr(document, selector, "content")
}
