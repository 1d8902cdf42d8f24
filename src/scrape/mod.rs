//! Page scraping
//!
//! This module turns a single URL into a [`Document`](crate::Document):
//! - Fetch strategy chain with per-host overrides and automatic fallback
//! - Content normalization from HTML to Markdown
//! - Metadata extraction from page headers
//! - The page fetcher composing the three, with existing-HTML reuse

mod metadata;
mod normalizer;
mod page_fetcher;
mod strategy;

pub use metadata::extract_metadata;
pub use normalizer::{escape_multiline_links, is_usable, normalize_html, remove_skip_links};
pub use page_fetcher::PageFetcher;
pub use strategy::{FetchStrategy, RawContent, StrategyChain};
