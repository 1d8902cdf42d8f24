//! URL handling module for Sumi-Harvest
//!
//! This module provides URL canonicalisation, site-host extraction, wildcard
//! host matching, and the link filter that decides which discovered links
//! the crawl frontier may enqueue.

mod domain;
mod filter;
mod matcher;
mod normalize;

pub use domain::{origin_of, site_host, strip_www};
pub use filter::LinkFilter;
pub use matcher::{is_file, is_social_or_email, matches_wildcard};
pub use normalize::{canonicalize, ensure_scheme, parse_http_url, path_depth};
