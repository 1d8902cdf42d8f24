//! HTML to Markdown normalization
//!
//! Normalization runs in four passes:
//! 1. Remove `script, style, iframe, noscript, meta, head` unconditionally
//! 2. With main-content-only, remove the boilerplate selector catalog
//! 3. Convert the remaining tree with `htmd`, using an inline link handler
//! 4. Escape newlines inside link text and drop "skip to content" links

use htmd::element_handler::{HandlerResult, Handlers};
use htmd::{Element, HtmlToMarkdown};
use regex::Regex;
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;
use tracing::warn;

/// Elements removed from every page
const ALWAYS_REMOVED: &[&str] = &["script", "style", "iframe", "noscript", "meta", "head"];

/// Boilerplate selectors removed in main-content-only mode
const NON_MAIN_SELECTORS: &[&str] = &[
    "header",
    "footer",
    "nav",
    "aside",
    ".header",
    ".top",
    ".navbar",
    "#header",
    ".footer",
    ".bottom",
    "#footer",
    ".sidebar",
    ".side",
    ".aside",
    "#sidebar",
    ".modal",
    ".popup",
    "#modal",
    ".overlay",
    ".ad",
    ".ads",
    ".advert",
    "#ad",
    ".lang-selector",
    ".language",
    "#language-selector",
    ".social",
    ".social-media",
    ".social-links",
    "#social",
    ".menu",
    ".navigation",
    "#nav",
    ".breadcrumbs",
    "#breadcrumbs",
    "#search-form",
    ".search",
    "#search",
    ".share",
    "#share",
    ".pagination",
    "#pagination",
    ".widget",
    "#widget",
    ".related",
    "#related",
    ".tag",
    "#tag",
    ".category",
    "#category",
    ".cookie",
    "#cookie",
];

#[allow(clippy::expect_used)]
static SKIP_TO_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[Skip to Content\]\(#[^\)]*\)").expect("hardcoded regex pattern is valid")
});

#[allow(clippy::expect_used)]
static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("hardcoded regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TEXT_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\r]*\n\s*").expect("hardcoded regex pattern is valid")
});

/// Stands in for a newline inside link text while `htmd` collapses whitespace
const LINK_BREAK: char = '\u{FDD0}';

/// Converts raw HTML into normalized Markdown
///
/// # Arguments
///
/// * `html` - Raw page HTML
/// * `only_main_content` - Also strip navigation, footers, sidebars and similar boilerplate
///
/// # Example
///
/// ```
/// use sumi_harvest::scrape::normalize_html;
///
/// let md = normalize_html("<h1>Grants</h1><p>Open <a href=\"/apply\">calls</a></p>", false);
/// assert_eq!(md, "# Grants\n\nOpen [calls](/apply)");
/// ```
pub fn normalize_html(html: &str, only_main_content: bool) -> String {
    let mut document = Html::parse_document(html);

    remove_matching(&mut document, ALWAYS_REMOVED);
    if only_main_content {
        remove_matching(&mut document, NON_MAIN_SELECTORS);
    }

    mark_link_breaks(&mut document);

    let converter = HtmlToMarkdown::builder()
        .add_handler(vec!["a"], link_handler)
        .build();
    let converted = match converter.convert(&document.html()) {
        Ok(markdown) => markdown.replace(LINK_BREAK, "\n"),
        Err(e) => {
            warn!("Markdown conversion failed: {}", e);
            return String::new();
        }
    };

    let markdown = EXCESS_BLANK_LINES.replace_all(&converted, "\n\n");
    let markdown = escape_multiline_links(markdown.trim());
    remove_skip_links(&markdown).trim().to_string()
}

/// Returns true when normalized text meets the usable-content threshold
pub fn is_usable(text: &str, min_length: usize) -> bool {
    text.trim().chars().count() >= min_length
}

/// Escapes newlines that fall inside `[...]` spans with a trailing backslash
///
/// Bracket depth never goes below zero, so a stray `]` cannot flip the state.
/// Backslash-escaped brackets are literal text and do not count.
pub fn escape_multiline_links(markdown: &str) -> String {
    let mut escaped = String::with_capacity(markdown.len());
    let mut open_brackets: usize = 0;
    let mut after_backslash = false;

    for c in markdown.chars() {
        match c {
            '[' if !after_backslash => open_brackets += 1,
            ']' if !after_backslash => open_brackets = open_brackets.saturating_sub(1),
            _ => {}
        }
        after_backslash = c == '\\' && !after_backslash;

        if c == '\n' && open_brackets > 0 {
            escaped.push_str("\\\n");
        } else {
            escaped.push(c);
        }
    }

    escaped
}

/// Removes `[Skip to Content](#...)` accessibility links, case-insensitively
pub fn remove_skip_links(markdown: &str) -> String {
    SKIP_TO_CONTENT.replace_all(markdown, "").into_owned()
}

/// Emits `[text](href "title")`, or plain text when the anchor has no target
fn link_handler(handlers: &dyn Handlers, element: Element) -> Option<HandlerResult> {
    let text = handlers.walk_children(element.node).content;
    let text = text.trim();

    let Some(href) = attr(&element, "href") else {
        return Some(HandlerResult::from(text.to_string()));
    };
    if text.is_empty() {
        return Some(HandlerResult::from(String::new()));
    }

    let markdown = match attr(&element, "title") {
        Some(title) => format!("[{}]({} \"{}\")", text, href.trim(), title),
        None => format!("[{}]({})", text, href.trim()),
    };
    Some(HandlerResult::from(markdown))
}

fn attr(element: &Element, name: &str) -> Option<String> {
    element
        .attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| a.value.to_string())
        .filter(|v| !v.trim().is_empty())
}

/// Replaces newlines inside link text with [`LINK_BREAK`]
///
/// Leading and trailing whitespace of each text node is left alone so the
/// spacing around the link survives.
fn mark_link_breaks(document: &mut Html) {
    let Ok(anchor) = Selector::parse("a[href]") else {
        return;
    };

    let marked: Vec<_> = document
        .select(&anchor)
        .flat_map(|a| a.descendants())
        .filter_map(|node| match node.value() {
            Node::Text(text) if text.trim().contains('\n') => Some((node.id(), mark_breaks(text))),
            _ => None,
        })
        .collect();

    for (id, text) in marked {
        if let Some(mut node) = document.tree.get_mut(id) {
            if let Node::Text(current) = node.value() {
                current.text = text.into();
            }
        }
    }
}

fn mark_breaks(text: &str) -> String {
    let core = text.trim();
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();
    let replacement = LINK_BREAK.to_string();
    format!(
        "{}{}{}",
        &text[..start],
        TEXT_LINE_BREAK.replace_all(core, replacement.as_str()),
        &text[end..]
    )
}

fn remove_matching(document: &mut Html, selectors: &[&str]) {
    let mut ids = Vec::new();
    for raw in selectors {
        if let Ok(selector) = Selector::parse(raw) {
            ids.extend(document.select(&selector).map(|el| el.id()));
        }
    }

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
