//! Site crawling
//!
//! This module discovers the pages of a site, including:
//! - Direct HTTP fetching with content-type checks
//! - HTML link extraction against the page origin
//! - The breadth-first frontier bounded by depth and a link cap

mod fetcher;
mod frontier;
mod parser;

pub use fetcher::{
    build_http_client, fetch_page, format_user_agent, is_text_content, FetchResult,
    SCRAPED_BY_HEADER,
};
pub use frontier::Frontier;
pub use parser::extract_links;
