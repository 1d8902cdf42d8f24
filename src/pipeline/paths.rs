//! Relative path rewriting in document content

use crate::document::Document;
use crate::url::origin_of;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

#[allow(clippy::expect_used)]
static IMAGE_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!\[[^\]]*\])\(([^)\s]+)((?:\s+"[^"]*")?)\)"#).expect("valid image regex")
});

/// Any `](target)`, so the outer target of a linked image `[![alt](src)](href)` matches too
#[allow(clippy::expect_used)]
static ANY_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\])\(([^)\s]+)((?:\s+"[^"]*")?)\)"#).expect("valid link regex")
});

/// Rewrites relative targets in `content` to absolute URLs on the source origin
///
/// Only image targets are rewritten unless `replace_all` is set, in which case
/// link targets are rewritten too. Targets that already parse as absolute URLs
/// (`http:`, `data:`, `mailto:` and so on) and in-page anchors are kept.
/// `markdown` is resynchronised with the rewritten content.
pub fn rewrite_paths(document: &mut Document, replace_all: bool) {
    let Ok(source) = Url::parse(document.source_url()) else {
        return;
    };
    let origin = origin_of(&source);
    let pattern = if replace_all { &*ANY_TARGET } else { &*IMAGE_TARGET };

    let rewritten = pattern
        .replace_all(&document.content, |caps: &Captures| {
            let target = &caps[2];
            match absolutize(&origin, target) {
                Some(absolute) => format!("{}({}{})", &caps[1], absolute, &caps[3]),
                None => caps[0].to_string(),
            }
        })
        .into_owned();

    document.set_content(rewritten);
}

fn absolutize(origin: &Url, target: &str) -> Option<String> {
    if target.starts_with('#') || Url::parse(target).is_ok() {
        return None;
    }
    origin
        .join(target.trim_start_matches('/'))
        .ok()
        .map(String::from)
}
