//! File names for emitted documents

use std::collections::HashMap;
use url::Url;

/// Run-scoped title generator
///
/// Owns the `Untitled N` counter and the set of names already handed out, so
/// two renders never share numbering.
#[derive(Debug, Default)]
pub struct TitleGenerator {
    untitled: usize,
    used: HashMap<String, usize>,
}

impl TitleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title for a source URL, unique within this generator
    ///
    /// The last non-empty path segment is used with `-` and `_` turned into
    /// spaces. URLs without one get `Untitled N`. Repeated titles gain a
    /// numeric suffix.
    pub fn title_for(&mut self, source_url: &str) -> String {
        let base = match last_segment(source_url) {
            Some(segment) => segment,
            None => {
                self.untitled += 1;
                format!("Untitled {}", self.untitled)
            }
        };

        let count = self.used.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{} ({})", base, count)
        }
    }
}

fn last_segment(source_url: &str) -> Option<String> {
    let url = Url::parse(source_url).ok()?;
    let segment = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()?
        .replace(['-', '_'], " ");
    let segment = segment.trim();
    (!segment.is_empty()).then(|| segment.to_string())
}
